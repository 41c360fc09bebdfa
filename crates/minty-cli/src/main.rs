//! `minty`: command-line companion for the Minty Labs site.
//!
//! Talks to a running `minty-server` for health, lead and notification
//! commands, and reads the content directory directly for browsing
//! testimonials and case studies.
//!
//! # Usage
//!
//! ```
//! minty --url http://localhost:3000 health
//! minty submit --name Jane --email jane@x.com --company Acme --consent
//! minty testimonials --industry healthcare --min-rating 4
//! minty carousel
//! ```

mod app;
mod client;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use app::CarouselApp;
use clap::{Args, Parser, Subcommand};
use client::ApiClient;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use minty_core::{
  carousel::CarouselController,
  content::ContentStore,
  filter::{self, CaseStudyCriteria, Filtered, Selection, TestimonialCriteria},
  form::{FormOutcome, LeadForm, SubmissionStatus},
  lead::LeadSubmission,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "minty", about = "Command-line companion for the Minty Labs site")]
struct Cli {
  /// Path to a TOML config file (url, content_dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:3000).
  #[arg(long, env = "MINTY_URL")]
  url: Option<String>,

  /// Directory holding testimonials.json and case_studies.json.
  #[arg(long, env = "CONTENT_DIR")]
  content_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check that the server is up.
  Health,
  /// Show lead counters.
  Stats,
  /// Submit a lead through the API.
  Submit(SubmitArgs),
  /// Inspect or test notification channels.
  #[command(subcommand)]
  Notifications(NotificationsCommand),
  /// List testimonials from the content directory.
  Testimonials {
    /// Industry slug, or `all`.
    #[arg(long)]
    industry:   Option<String>,
    /// Minimum star rating (0 = any).
    #[arg(long, default_value_t = 0)]
    min_rating: u8,
  },
  /// List case studies from the content directory.
  CaseStudies {
    /// Category name, or `all`.
    #[arg(long)]
    category: Option<String>,
    /// Case-insensitive text to look for in title, challenge and category.
    #[arg(long, default_value = "")]
    search:   String,
  },
  /// Show one case study and its related studies.
  CaseStudy {
    slug: String,
  },
  /// Rotate through the featured testimonials in the terminal.
  Carousel {
    /// Seconds per slide.
    #[arg(long, default_value_t = 5)]
    interval: u64,
  },
}

#[derive(Subcommand, Debug)]
enum NotificationsCommand {
  /// Show which channels are enabled and configured.
  Status,
  /// Send a test lead through every enabled channel.
  Test,
}

#[derive(Args, Debug)]
struct SubmitArgs {
  #[arg(long)]
  name:        String,
  #[arg(long)]
  email:       String,
  #[arg(long)]
  company:     String,
  #[arg(long)]
  role:        Option<String>,
  #[arg(long)]
  tech_stack:  Option<String>,
  #[arg(long)]
  seniority:   Option<String>,
  #[arg(long)]
  time_zone:   Option<String>,
  #[arg(long)]
  start_date:  Option<String>,
  #[arg(long)]
  description: Option<String>,
  #[arg(long)]
  consent:     bool,
}

impl From<SubmitArgs> for LeadSubmission {
  fn from(a: SubmitArgs) -> Self {
    LeadSubmission {
      full_name:   Some(a.name),
      email:       Some(a.email),
      company:     Some(a.company),
      role:        a.role,
      tech_stack:  a.tech_stack,
      seniority:   a.seniority,
      time_zone:   a.time_zone,
      start_date:  a.start_date,
      description: a.description,
      consent:     Some(a.consent),
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         Option<String>,
  #[serde(default)]
  content_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let url = cli
    .url
    .or(file_cfg.url)
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let content_dir = cli
    .content_dir
    .or(file_cfg.content_dir)
    .unwrap_or_else(|| PathBuf::from("content"));

  match cli.command {
    Command::Health => {
      let h = ApiClient::new(url)?.health().await?;
      println!(
        "{} ({}): {} at {}",
        h.status, h.environment, h.message, h.timestamp
      );
    }
    Command::Stats => {
      let stats = ApiClient::new(url)?
        .stats()
        .await?
        .data
        .context("stats reply carried no data")?;
      println!("total       {}", stats.total);
      println!("new         {}", stats.new);
      println!("contacted   {}", stats.contacted);
      println!("qualified   {}", stats.qualified);
      println!("closed      {}", stats.closed);
      println!("today       {}", stats.today);
      println!("conversion  {}%", stats.conversion_rate);
    }
    Command::Submit(args) => submit(ApiClient::new(url)?, args.into()).await?,
    Command::Notifications(NotificationsCommand::Status) => {
      let reply = ApiClient::new(url)?.notification_status().await?;
      println!("{}", serde_json::to_string_pretty(&reply.data)?);
    }
    Command::Notifications(NotificationsCommand::Test) => {
      let reply = ApiClient::new(url)?.notification_test().await?;
      let data = reply.data.unwrap_or_default();
      for channel in ["email", "telegram"] {
        let c = &data[channel];
        println!(
          "{channel:<9} enabled={} sent={}  {}",
          c["enabled"],
          c["sent"],
          c["message"].as_str().unwrap_or_default()
        );
      }
    }
    Command::Testimonials {
      industry,
      min_rating,
    } => {
      let store = load_content(&content_dir)?;
      let criteria = TestimonialCriteria {
        industry: Selection::from(industry),
        min_rating,
      };
      let listing = filter::filter(store.testimonials(), &criteria);
      for t in &listing.items {
        println!(
          "{:<5} {}  {} ({}, {})  [{}]",
          "★".repeat(t.rating as usize),
          t.quote,
          t.author,
          t.title,
          t.company,
          t.industry
        );
      }
      print_footer(&listing, "testimonials");
    }
    Command::CaseStudies { category, search } => {
      let store = load_content(&content_dir)?;
      let criteria = CaseStudyCriteria {
        category: Selection::from(category),
        search,
      };
      let listing = filter::filter(store.case_studies(), &criteria);
      for cs in &listing.items {
        println!("{:<28} {:<14} {}", cs.slug, cs.category, cs.title);
      }
      print_footer(&listing, "case studies");
    }
    Command::CaseStudy { slug } => {
      let store = load_content(&content_dir)?;
      let cs = store
        .case_study(&slug)
        .with_context(|| format!("no case study with slug {slug:?}"))?;
      println!(
        "{}\n{} · {} · {}\n",
        cs.title, cs.category, cs.duration, cs.team_size
      );
      println!("Challenge\n  {}\n", cs.challenge);
      println!("Solution\n  {}\n", cs.solution);
      println!("Results");
      for r in &cs.results {
        println!("  {:>8}  {}", r.metric, r.label);
      }
      println!("\nTechnologies  {}", cs.technologies.join(", "));
      println!(
        "\n“{}”\n  {}, {} at {}",
        cs.testimonial.quote,
        cs.testimonial.author,
        cs.testimonial.title,
        cs.testimonial.company
      );
      let related = store.related(cs, 2);
      if !related.is_empty() {
        println!("\nRelated");
        for r in related {
          println!("  {:<28} {}", r.slug, r.title);
        }
      }
    }
    Command::Carousel { interval } => {
      let store = load_content(&content_dir)?;
      let items = store.featured_testimonials().into_iter().cloned().collect();
      let interval = Duration::from_secs(interval.max(1));
      let carousel = CarouselController::with_interval(items, interval);
      run_carousel(CarouselApp::new(carousel))?;
    }
  }

  Ok(())
}

fn load_content(dir: &Path) -> Result<ContentStore> {
  ContentStore::load(dir)
    .with_context(|| format!("loading content from {}", dir.display()))
}

fn print_footer<T>(listing: &Filtered<'_, T>, noun: &str) {
  println!("\nShowing {} of {} {noun}", listing.items.len(), listing.total);
  if listing.needs_reset() {
    println!(
      "No {noun} match these filters. Drop the filter flags to see everything."
    );
  }
}

// ─── Submit ───────────────────────────────────────────────────────────────────

async fn submit(client: ApiClient, fields: LeadSubmission) -> Result<()> {
  let mut form = LeadForm::default();
  form.fields = fields;
  form.begin();

  let outcome = match client.submit(&form.fields).await {
    Ok(reply) => {
      if let Some(receipt) = &reply.data {
        tracing::info!(id = %receipt.id, "lead accepted");
        println!("id       {}", receipt.id);
        println!("email    {}", receipt.email);
        println!("company  {}", receipt.company);
      }
      FormOutcome::Replied {
        success: reply.success,
        message: reply.message,
      }
    }
    Err(e) => {
      tracing::warn!(error = %e, "submission failed");
      FormOutcome::Unreachable
    }
  };
  form.finish(outcome);

  let banner = form.banner();
  match banner.status {
    SubmissionStatus::Success => {
      println!("{}", banner.message);
      Ok(())
    }
    _ => anyhow::bail!("{}", banner.message),
  }
}

// ─── Carousel ─────────────────────────────────────────────────────────────────

fn run_carousel(mut app: CarouselApp) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let result = event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  result
}

fn event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut CarouselApp,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The autoplay timer runs on the runtime; polling here must not starve it.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key)
    {
      break;
    }
  }
  Ok(())
}
