//! Terminal carousel state and key dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use minty_core::{
  carousel::{CarouselController, CarouselEvent, CarouselState},
  content::Testimonial,
};

/// Top-level state of the `minty carousel` screen.
pub struct CarouselApp {
  pub carousel: CarouselController<Testimonial>,

  /// Stand-in for the pointer hovering the card; toggled with `p`.
  pub hovering: bool,
}

impl CarouselApp {
  pub fn new(carousel: CarouselController<Testimonial>) -> Self {
    Self {
      carousel,
      hovering: false,
    }
  }

  pub fn state(&self) -> CarouselState { self.carousel.state() }

  /// Map a key press to a carousel event. Returns `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return false;
    }

    let event = match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return false,
      KeyCode::Right | KeyCode::Char('l') => CarouselEvent::Next,
      KeyCode::Left | KeyCode::Char('h') => CarouselEvent::Prev,
      KeyCode::Char(' ') => CarouselEvent::ToggleAutoPlay,
      KeyCode::Char('p') => {
        self.hovering = !self.hovering;
        if self.hovering {
          CarouselEvent::PointerEnter
        } else {
          CarouselEvent::PointerLeave
        }
      }
      // Slides are numbered from 1 on screen.
      KeyCode::Char(c @ '1'..='9') => {
        CarouselEvent::GoTo(c as usize - '1' as usize)
      }
      _ => return true,
    };
    self.carousel.dispatch(event);
    true
  }
}

#[cfg(test)]
mod tests {
  use minty_core::content::Testimonial;

  use super::*;

  fn slides(n: usize) -> Vec<Testimonial> {
    (0..n)
      .map(|i| Testimonial {
        id: format!("t{i}"),
        author: "A".into(),
        initial: "A".into(),
        title: "CTO".into(),
        company: "Co".into(),
        quote: "Good".into(),
        rating: 5,
        industry: "Retail".into(),
        project_duration: "1 month".into(),
        team_size: "2".into(),
        featured: true,
      })
      .collect()
  }

  fn press(app: &mut CarouselApp, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  #[tokio::test]
  async fn arrows_and_digits_navigate() {
    let mut app = CarouselApp::new(CarouselController::new(slides(3)));
    assert!(press(&mut app, KeyCode::Right));
    assert_eq!(app.state().index, 1);
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.state().index, 2);
    press(&mut app, KeyCode::Char('1'));
    assert_eq!(app.state().index, 0);
    // Slide 9 does not exist.
    press(&mut app, KeyCode::Char('9'));
    assert_eq!(app.state().index, 0);
  }

  #[tokio::test]
  async fn hover_toggle_pauses_and_resumes() {
    let mut app = CarouselApp::new(CarouselController::new(slides(2)));
    press(&mut app, KeyCode::Char('p'));
    assert!(app.state().paused);
    press(&mut app, KeyCode::Char('p'));
    assert!(!app.state().paused);
  }

  #[tokio::test]
  async fn space_toggles_autoplay_and_q_quits() {
    let mut app = CarouselApp::new(CarouselController::new(slides(2)));
    press(&mut app, KeyCode::Char(' '));
    assert!(!app.state().auto_playing);
    assert!(!press(&mut app, KeyCode::Char('q')));
  }
}
