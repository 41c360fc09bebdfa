//! Message bodies for new-lead notifications.
//!
//! Lead fields are user input and are escaped for the target format: HTML
//! entities for email, Markdown control characters for Telegram.

use minty_core::lead::Lead;

const RECEIVED_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

pub fn email_subject(lead: &Lead) -> String {
  format!("New lead: {} from {}", lead.full_name, lead.company)
}

/// Optional lead fields in display order, with their labels.
fn optional_fields(lead: &Lead) -> [(&'static str, Option<&str>); 5] {
  [
    ("Role", lead.role.as_deref()),
    ("Seniority", lead.seniority.as_deref()),
    ("Tech stack", lead.tech_stack.as_deref()),
    ("Time zone", lead.time_zone.as_deref()),
    ("Start date", lead.start_date.as_deref()),
  ]
}

pub fn email_html(lead: &Lead) -> String {
  let mut rows = vec![
    row("Name", &escape_html(&lead.full_name)),
    row(
      "Email",
      &format!(
        r#"<a href="mailto:{0}">{0}</a>"#,
        escape_html(&lead.email)
      ),
    ),
    row("Company", &escape_html(&lead.company)),
  ];
  rows.extend(
    optional_fields(lead)
      .into_iter()
      .filter_map(|(label, v)| v.map(|v| row(label, &escape_html(v)))),
  );

  let description = lead
    .description
    .as_deref()
    .map(|d| {
      format!(
        "<h3>Project description</h3>\n<p>{}</p>\n",
        escape_html(d)
      )
    })
    .unwrap_or_default();

  format!(
    "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n\
     <h1>New lead</h1>\n\
     <table style=\"width: 100%; border-collapse: collapse;\">\n{rows}</table>\n\
     {description}\
     <p>Reply within 48 hours.</p>\n\
     <p>Received: {received}<br>Source: {source}<br>Lead ID: {id}</p>\n\
     </div>\n",
    rows = rows.concat(),
    received = lead.created_at.format(RECEIVED_FORMAT),
    source = escape_html(&lead.source),
    id = escape_html(&lead.id),
  )
}

fn row(label: &str, value: &str) -> String {
  format!("<tr><td><strong>{label}:</strong></td><td>{value}</td></tr>\n")
}

/// Telegram message in legacy `Markdown` parse mode.
pub fn telegram_text(lead: &Lead) -> String {
  let mut lines = vec![
    "*NEW LEAD FOR MINTY LABS*".to_owned(),
    String::new(),
    format!("*Client:* {}", escape_markdown(&lead.full_name)),
    format!("*Email:* {}", escape_markdown(&lead.email)),
    format!("*Company:* {}", escape_markdown(&lead.company)),
  ];
  lines.extend(
    optional_fields(lead)
      .into_iter()
      .filter_map(|(label, v)| v.map(|v| format!("*{label}:* {}", escape_markdown(v)))),
  );
  if let Some(d) = &lead.description {
    lines.push(format!("*Description:*\n{}", escape_markdown(d)));
  }
  lines.extend([
    String::new(),
    "*Response time:* 48 hours".to_owned(),
    format!("*Received:* {}", lead.created_at.format(RECEIVED_FORMAT)),
    format!("*ID:* {}", escape_markdown(&lead.id)),
  ]);
  lines.join("\n")
}

fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}

/// Legacy Markdown only treats these four characters as markup.
fn escape_markdown(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '_' | '*' | '`' | '[') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
