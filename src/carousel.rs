//! Windowed carousel scheduler
//!
//! [`Carousel`] is the pure state: an offset into a fixed list and the
//! window of items visible from it. [`Rotator`] runs a carousel on a timer as
//! a task that owns it; callers talk to the task through a handle, so the
//! offset has a single writer. Dropping the handle stops the timer.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, sleep_until};
use tracing::{debug, instrument, trace};

use crate::WanderLensError;

/// How the offset wraps at the ends of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wrap {
    /// Offset stays in `[0, len - window]`: past the end goes to 0, before
    /// the start goes to `len - window`.
    #[default]
    Bounded,
    /// Offset moves modulo `len`; the window wraps across the end.
    Circular,
}

/// A fixed-size window over a fixed list
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Arc<[T]>,
    window: usize,
    offset: usize,
    paused: bool,
    wrap: Wrap,
}

impl<T> Carousel<T> {
    /// A window larger than the list is clamped to the list length.
    pub fn new(items: impl Into<Arc<[T]>>, window: usize) -> Self {
        let items = items.into();
        let window = window.min(items.len());
        Self {
            items,
            window,
            offset: 0,
            paused: false,
            wrap: Wrap::Bounded,
        }
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn wrap(&self) -> Wrap {
        self.wrap
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Nothing to rotate when the whole list fits in the window.
    fn is_static(&self) -> bool {
        self.items.len() <= self.window
    }

    /// Timer step. Returns whether the offset moved.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.advance()
    }

    /// Step forward by one. Returns whether the offset moved.
    pub fn advance(&mut self) -> bool {
        if self.is_static() {
            return false;
        }
        let len = self.items.len();
        let before = self.offset;
        self.offset = match self.wrap {
            Wrap::Bounded if self.offset + 1 > len - self.window => 0,
            Wrap::Bounded => self.offset + 1,
            Wrap::Circular => (self.offset + 1) % len,
        };
        before != self.offset
    }

    /// Step back by one. Returns whether the offset moved.
    pub fn retreat(&mut self) -> bool {
        if self.is_static() {
            return false;
        }
        let len = self.items.len();
        let before = self.offset;
        self.offset = match (self.wrap, self.offset) {
            (Wrap::Bounded, 0) => len - self.window,
            (Wrap::Circular, 0) => len - 1,
            (_, offset) => offset - 1,
        };
        before != self.offset
    }

    /// Move the window to start at `page * window`.
    ///
    /// The only check is that the start lies inside the list; a refused jump
    /// leaves the offset unchanged.
    pub fn jump_to(&mut self, page: usize) -> Result<(), WanderLensError> {
        let start = page
            .checked_mul(self.window)
            .filter(|start| *start < self.items.len());
        match start {
            Some(start) => {
                self.offset = start;
                Ok(())
            }
            None => Err(WanderLensError::validation(format!(
                "page {page} is outside the carousel ({} pages)",
                self.page_count()
            ))),
        }
    }

    /// `window` items from the offset, indices taken modulo the list length.
    pub fn visible_window(&self) -> Vec<&T> {
        let len = self.items.len();
        (0..self.window)
            .map(|i| &self.items[(self.offset + i) % len])
            .collect()
    }

    /// Number of indicator pages, `ceil(len / window)`
    pub fn page_count(&self) -> usize {
        if self.window == 0 {
            0
        } else {
            self.items.len().div_ceil(self.window)
        }
    }

    /// Indicator page containing the offset
    pub fn current_page(&self) -> usize {
        if self.window == 0 {
            0
        } else {
            self.offset / self.window
        }
    }
}

impl<T: Clone> Carousel<T> {
    /// Owned snapshot for rendering or serialization
    pub fn view(&self) -> CarouselView<T> {
        CarouselView {
            offset: self.offset,
            window_size: self.window,
            len: self.items.len(),
            page: self.current_page(),
            page_count: self.page_count(),
            paused: self.paused,
            wrap: self.wrap,
            items: self.visible_window().into_iter().cloned().collect(),
        }
    }
}

/// Point-in-time state of a carousel
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarouselView<T> {
    pub offset: usize,
    pub window_size: usize,
    pub len: usize,
    pub page: usize,
    pub page_count: usize,
    pub paused: bool,
    pub wrap: Wrap,
    pub items: Vec<T>,
}

/// Manual control of a running rotator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Next,
    Prev,
    Jump(usize),
    Pause,
    Resume,
}

enum Command<T> {
    Control(Control, oneshot::Sender<Result<CarouselView<T>, WanderLensError>>),
    Snapshot(oneshot::Sender<CarouselView<T>>),
}

/// Handle to a carousel advanced by its own timer task.
///
/// The task owns the carousel. It stops when the handle is dropped. A pause
/// requested through [`Control::Pause`] lifts itself after `pause_limit`, so a
/// lost resume cannot freeze the carousel.
#[derive(Debug)]
pub struct Rotator<T> {
    name: &'static str,
    tx: mpsc::Sender<Command<T>>,
    task: JoinHandle<()>,
}

impl<T> Rotator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawn the timer task. Must be called inside a tokio runtime.
    pub fn spawn(
        name: &'static str,
        carousel: Carousel<T>,
        interval: Duration,
        pause_limit: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run(name, carousel, Schedule::new(interval, pause_limit), rx));
        debug!(
            rotator = name,
            interval_ms = interval.as_millis() as u64,
            pause_limit_ms = pause_limit.as_millis() as u64,
            "Rotator started"
        );
        Self { name, tx, task }
    }

    /// Current state of the carousel
    pub async fn snapshot(&self) -> Result<CarouselView<T>, WanderLensError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        rx.await.map_err(|_| self.stopped())
    }

    /// Apply a manual control and return the resulting state
    #[instrument(skip(self), fields(rotator = self.name))]
    pub async fn control(&self, control: Control) -> Result<CarouselView<T>, WanderLensError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Control(control, reply)).await?;
        rx.await.map_err(|_| self.stopped())?
    }

    async fn send(&self, command: Command<T>) -> Result<(), WanderLensError> {
        self.tx.send(command).await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> WanderLensError {
        WanderLensError::not_found(format!("rotator '{}' is not running", self.name))
    }
}

impl<T> Drop for Rotator<T> {
    fn drop(&mut self) {
        self.task.abort();
        debug!(rotator = self.name, "Rotator stopped");
    }
}

/// Timers owned by the rotator task
struct Schedule {
    interval: Interval,
    period: Duration,
    pause_limit: Duration,
    pause_deadline: Option<Instant>,
}

impl Schedule {
    fn new(period: Duration, pause_limit: Duration) -> Self {
        // First tick one full period after start, like a browser interval.
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            period,
            pause_limit,
            pause_deadline: None,
        }
    }

    /// No catch-up: the next tick is a full period from now.
    fn restart(&mut self) {
        self.interval.reset_at(Instant::now() + self.period);
    }
}

async fn run<T: Clone>(
    name: &'static str,
    mut carousel: Carousel<T>,
    mut schedule: Schedule,
    mut rx: mpsc::Receiver<Command<T>>,
) {
    loop {
        let pause_deadline = schedule.pause_deadline;
        tokio::select! {
            _ = schedule.interval.tick() => {
                if carousel.tick() {
                    trace!(rotator = name, offset = carousel.offset(), "tick");
                }
            }
            _ = sleep_until(pause_deadline.unwrap_or_else(Instant::now)), if pause_deadline.is_some() => {
                debug!(rotator = name, "Pause limit reached, resuming");
                schedule.pause_deadline = None;
                carousel.set_paused(false);
                schedule.restart();
            }
            command = rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Snapshot(reply) => {
                        let _ = reply.send(carousel.view());
                    }
                    Command::Control(control, reply) => {
                        let result = apply(&mut carousel, control, &mut schedule);
                        let _ = reply.send(result.map(|()| carousel.view()));
                    }
                }
            }
        }
    }
}

fn apply<T>(
    carousel: &mut Carousel<T>,
    control: Control,
    schedule: &mut Schedule,
) -> Result<(), WanderLensError> {
    match control {
        Control::Next => {
            carousel.advance();
        }
        Control::Prev => {
            carousel.retreat();
        }
        Control::Jump(page) => carousel.jump_to(page)?,
        Control::Pause => {
            carousel.set_paused(true);
            schedule.pause_deadline = Some(Instant::now() + schedule.pause_limit);
        }
        Control::Resume => {
            if carousel.is_paused() {
                schedule.restart();
            }
            schedule.pause_deadline = None;
            carousel.set_paused(false);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbers(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    fn window_of(carousel: &Carousel<usize>) -> Vec<usize> {
        carousel.visible_window().into_iter().copied().collect()
    }

    #[test]
    fn test_tick_wraps_when_window_would_run_short() {
        let mut carousel = Carousel::new(numbers(7), 3);
        let offsets: Vec<usize> = (0..6)
            .map(|_| {
                carousel.tick();
                carousel.offset()
            })
            .collect();
        assert_eq!(offsets, vec![1, 2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_retreat_wraps_to_last_full_window() {
        let mut carousel = Carousel::new(numbers(7), 3);
        assert!(carousel.retreat());
        assert_eq!(carousel.offset(), 4);
        assert_eq!(window_of(&carousel), vec![4, 5, 6]);
        carousel.retreat();
        assert_eq!(carousel.offset(), 3);
    }

    #[test]
    fn test_paused_tick_does_nothing() {
        let mut carousel = Carousel::new(numbers(5), 2);
        carousel.set_paused(true);
        assert!(!carousel.tick());
        assert_eq!(carousel.offset(), 0);
        // manual steps still work while paused
        assert!(carousel.advance());
        assert_eq!(carousel.offset(), 1);
    }

    #[rstest]
    fn test_circular_cycle_returns_after_len_ticks(
        #[values(4, 5, 7, 10)] len: usize,
        #[values(1, 2, 3)] window: usize,
    ) {
        let mut carousel = Carousel::new(numbers(len), window).with_wrap(Wrap::Circular);
        carousel.advance();
        let start = carousel.offset();
        for _ in 0..len {
            carousel.tick();
        }
        assert_eq!(carousel.offset(), start);
    }

    #[rstest]
    fn test_bounded_cycle_period(
        #[values(4, 5, 7, 10)] len: usize,
        #[values(1, 2, 3)] window: usize,
    ) {
        let mut carousel = Carousel::new(numbers(len), window);
        let period = len - window + 1;
        for step in 1..period {
            carousel.tick();
            assert_ne!(carousel.offset(), 0, "returned early at step {step}");
        }
        carousel.tick();
        assert_eq!(carousel.offset(), 0);
    }

    #[rstest]
    #[case(7, 3)]
    #[case(7, 4)]
    #[case(10, 3)]
    #[case(5, 2)]
    fn test_jump_then_window_is_always_full(#[case] len: usize, #[case] window: usize) {
        let mut carousel = Carousel::new(numbers(len), window);
        for page in 0..carousel.page_count() {
            carousel.jump_to(page).unwrap();
            let visible = window_of(&carousel);
            assert_eq!(visible.len(), window);
            let expected: Vec<usize> = (0..window).map(|i| (page * window + i) % len).collect();
            assert_eq!(visible, expected);
        }
    }

    #[test]
    fn test_jump_past_end_is_refused() {
        let mut carousel = Carousel::new(numbers(7), 3);
        carousel.advance();
        let result = carousel.jump_to(3);
        assert!(matches!(result, Err(WanderLensError::Validation { .. })));
        assert_eq!(carousel.offset(), 1);
    }

    #[test]
    fn test_last_page_wraps_to_start() {
        let mut carousel = Carousel::new(numbers(7), 3);
        carousel.jump_to(2).unwrap();
        assert_eq!(window_of(&carousel), vec![6, 0, 1]);
    }

    #[rstest]
    #[case(3, 3)]
    #[case(3, 4)]
    #[case(1, 3)]
    fn test_short_list_clamps_window_and_never_moves(#[case] len: usize, #[case] window: usize) {
        let mut carousel = Carousel::new(numbers(len), window);
        assert_eq!(carousel.window_size(), len);
        assert!(!carousel.tick());
        assert!(!carousel.advance());
        assert!(!carousel.retreat());
        assert_eq!(carousel.offset(), 0);
        assert_eq!(window_of(&carousel), numbers(len));
        assert_eq!(carousel.page_count(), 1);
    }

    #[test]
    fn test_empty_list() {
        let mut carousel = Carousel::new(Vec::<usize>::new(), 3);
        assert!(carousel.is_empty());
        assert!(!carousel.tick());
        assert!(carousel.visible_window().is_empty());
        assert_eq!(carousel.page_count(), 0);
        assert!(carousel.jump_to(0).is_err());
    }

    #[test]
    fn test_view_reports_pages() {
        let mut carousel = Carousel::new(numbers(7), 3);
        carousel.jump_to(1).unwrap();
        let view = carousel.view();
        assert_eq!(view.offset, 3);
        assert_eq!(view.page, 1);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.items, vec![3, 4, 5]);
        assert!(!view.paused);
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let items: Arc<[usize]> = numbers(7).into();
        let mut destinations = Carousel::new(items.clone(), 4);
        let reviews = Carousel::new(items, 3);
        destinations.advance();
        assert_eq!(destinations.offset(), 1);
        assert_eq!(reviews.offset(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_advances_on_interval() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(4),
            Duration::from_secs(60),
        );

        assert_eq!(rotator.snapshot().await.unwrap().offset, 0);
        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 1);
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_pause_has_no_catch_up() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(4),
            Duration::from_secs(60),
        );

        let view = rotator.control(Control::Pause).await.unwrap();
        assert!(view.paused);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 0);

        rotator.control(Control::Resume).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 0);
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_pause_lifts_after_limit() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(4),
            Duration::from_secs(30),
        );

        rotator.control(Control::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(29)).await;
        let view = rotator.snapshot().await.unwrap();
        assert!(view.paused);
        assert_eq!(view.offset, 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let view = rotator.snapshot().await.unwrap();
        assert!(!view.paused);
        assert_eq!(view.offset, 0);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(rotator.snapshot().await.unwrap().offset, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_repeated_pause_extends_limit() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(4),
            Duration::from_secs(30),
        );

        rotator.control(Control::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(20)).await;
        rotator.control(Control::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(rotator.snapshot().await.unwrap().paused);

        tokio::time::sleep(Duration::from_secs(11)).await;
        let view = rotator.snapshot().await.unwrap();
        assert!(!view.paused);
        assert_eq!(view.offset, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_manual_controls() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );

        assert_eq!(rotator.control(Control::Prev).await.unwrap().offset, 4);
        assert_eq!(rotator.control(Control::Next).await.unwrap().offset, 0);
        let view = rotator.control(Control::Jump(2)).await.unwrap();
        assert_eq!(view.items, vec![6, 0, 1]);
        assert!(rotator.control(Control::Jump(5)).await.is_err());
        assert_eq!(rotator.snapshot().await.unwrap().offset, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_rotator_stops_task() {
        let rotator = Rotator::spawn(
            "test",
            Carousel::new(numbers(7), 3),
            Duration::from_secs(1),
            Duration::from_secs(60),
        );
        let tx = rotator.tx.clone();
        drop(rotator);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(tx.is_closed());
    }
}
