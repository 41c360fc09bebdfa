//! The testimonial carousel: a pure state machine plus a tokio-driven timer.
//!
//! [`CarouselState::transition`] holds all of the rotation rules and never
//! touches a clock. [`CarouselController`] owns one background task that
//! turns the passage of time into [`CarouselEvent::Tick`]s. The task restarts
//! its countdown whenever the state changes, so manual navigation or a pause
//! never leaves a stale timer behind.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

/// How long each slide stays up while autoplaying.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(5);

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
  Next,
  Prev,
  /// Jump to a slide. Out-of-range indices are ignored.
  GoTo(usize),
  /// The autoplay timer elapsed.
  Tick,
  /// The pointer entered the carousel region.
  PointerEnter,
  /// The pointer left the carousel region.
  PointerLeave,
  ToggleAutoPlay,
  SetAutoPlay(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
  pub index:        usize,
  pub len:          usize,
  pub auto_playing: bool,
  pub paused:       bool,
}

impl CarouselState {
  pub fn new(len: usize) -> Self {
    Self {
      index: 0,
      len,
      auto_playing: true,
      paused: false,
    }
  }

  /// Whether the autoplay timer should be counting down.
  pub fn is_rotating(&self) -> bool {
    self.len > 0 && self.auto_playing && !self.paused
  }

  pub fn transition(self, event: CarouselEvent) -> Self {
    use CarouselEvent::*;

    if self.len == 0 {
      return self;
    }
    match event {
      Next => Self {
        index: (self.index + 1) % self.len,
        ..self
      },
      Prev => Self {
        index: (self.index + self.len - 1) % self.len,
        ..self
      },
      GoTo(i) if i < self.len => Self { index: i, ..self },
      GoTo(_) => self,
      Tick if self.is_rotating() => self.transition(Next),
      Tick => self,
      PointerEnter => Self {
        paused: true,
        ..self
      },
      PointerLeave => Self {
        paused: false,
        ..self
      },
      ToggleAutoPlay => Self {
        auto_playing: !self.auto_playing,
        ..self
      },
      SetAutoPlay(on) => Self {
        auto_playing: on,
        ..self
      },
    }
  }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Owns a slide sequence, its [`CarouselState`] and the autoplay timer.
///
/// Must be created inside a tokio runtime when `items` is non-empty. The timer
/// task is aborted when the controller is dropped.
pub struct CarouselController<T> {
  items: Vec<T>,
  state: Arc<watch::Sender<CarouselState>>,
  timer: Option<JoinHandle<()>>,
}

impl<T> CarouselController<T> {
  pub fn new(items: Vec<T>) -> Self {
    Self::with_interval(items, AUTOPLAY_INTERVAL)
  }

  pub fn with_interval(items: Vec<T>, interval: Duration) -> Self {
    let (tx, _) = watch::channel(CarouselState::new(items.len()));
    let state = Arc::new(tx);
    let timer = (!items.is_empty())
      .then(|| tokio::spawn(drive(Arc::clone(&state), interval)));
    Self {
      items,
      state,
      timer,
    }
  }

  pub fn state(&self) -> CarouselState { *self.state.borrow() }

  pub fn items(&self) -> &[T] { &self.items }

  /// The slide currently on screen; `None` for an empty carousel.
  pub fn current(&self) -> Option<&T> { self.items.get(self.state().index) }

  /// Watch every state change, including timer-driven ones.
  pub fn subscribe(&self) -> watch::Receiver<CarouselState> {
    self.state.subscribe()
  }

  /// Apply `event` and return the resulting state.
  pub fn dispatch(&self, event: CarouselEvent) -> CarouselState {
    apply(&self.state, event)
  }

  pub fn next(&self) -> CarouselState { self.dispatch(CarouselEvent::Next) }

  pub fn prev(&self) -> CarouselState { self.dispatch(CarouselEvent::Prev) }

  pub fn go_to(&self, index: usize) -> CarouselState {
    self.dispatch(CarouselEvent::GoTo(index))
  }
}

impl<T> Drop for CarouselController<T> {
  fn drop(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.abort();
    }
  }
}

fn apply(
  state: &watch::Sender<CarouselState>,
  event: CarouselEvent,
) -> CarouselState {
  let mut out = *state.borrow();
  state.send_if_modified(|s| {
    let next = s.transition(event);
    out = next;
    if next == *s {
      return false;
    }
    tracing::debug!(?event, from = s.index, to = next.index, "carousel transition");
    *s = next;
    true
  });
  out
}

/// Timer loop. Each pass reads the latest state; while rotating it races one
/// interval against the next state change, so any change restarts the
/// countdown from zero.
async fn drive(state: Arc<watch::Sender<CarouselState>>, interval: Duration) {
  let mut rx = state.subscribe();
  loop {
    let current = *rx.borrow_and_update();
    if current.is_rotating() {
      tokio::select! {
        () = tokio::time::sleep(interval) => {
          apply(&state, CarouselEvent::Tick);
        }
        changed = rx.changed() => {
          if changed.is_err() {
            return;
          }
        }
      }
    } else if rx.changed().await.is_err() {
      return;
    }
  }
}
