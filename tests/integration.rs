//! End-to-end tests for the fetch fallback chain and the playback engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;

use digitshow::constants::{GRID_SIZE, HOLD_DURATION};
use digitshow::fetch::{
    FetchOutcome, FetchResult, FetchTask, FrameSource, fetch_with_fallback, parse_digit,
};
use digitshow::frame::DigitFrame;
use digitshow::playback::{Playback, TriggerSignal};

fn frame_filled_with(value: u8) -> DigitFrame {
    DigitFrame::from_rows(vec![vec![value; GRID_SIZE]; GRID_SIZE]).unwrap()
}

/// What a stub source answers every time it is asked.
enum Script {
    Frames(Vec<u8>), // one frame per fill value
    Empty,
    Fail,
}

struct StubSource {
    label: &'static str,
    script: Script,
    calls: Arc<AtomicUsize>,
}

impl StubSource {
    fn new(label: &'static str, script: Script) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { label, script, calls: Arc::clone(&calls) }, calls)
    }
}

impl FrameSource for StubSource {
    fn label(&self) -> &str {
        self.label
    }

    fn fetch(&self, _digit: u8) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Frames(values) => {
                FetchOutcome::Frames(values.iter().map(|&v| frame_filled_with(v)).collect())
            }
            Script::Empty => FetchOutcome::Empty,
            Script::Fail => FetchOutcome::Failed(anyhow!("connection refused")),
        }
    }
}

fn chain(primary: StubSource, secondary: StubSource) -> Vec<Box<dyn FrameSource>> {
    vec![Box::new(primary), Box::new(secondary)]
}

/// Scenario: input "5", primary answers with one frame. The secondary
/// is never contacted, playback starts at index 0, and the trigger is
/// released once no further frame appears after the hold.
#[test]
fn primary_success_plays_single_frame() {
    let digit = parse_digit("5").unwrap();
    let (primary, _) = StubSource::new("remote", Script::Frames(vec![128]));
    let (secondary, secondary_calls) = StubSource::new("local", Script::Empty);

    let cancel = AtomicBool::new(false);
    let frames = fetch_with_fallback(&chain(primary, secondary), digit, &cancel)
        .unwrap()
        .unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);

    let mut playback = Playback::new();
    playback.extend(frames);
    assert_eq!(playback.current_index(), Some(0));

    for _ in 0..HOLD_DURATION {
        let (_, signal) = playback.tick();
        assert_ne!(signal, TriggerSignal::Enable);
    }
    let (_, signal) = playback.tick();
    assert_eq!(signal, TriggerSignal::Enable);
}

/// Scenario: input "12" never reaches the network.
#[test]
fn out_of_range_input_is_rejected_before_any_request() {
    assert_eq!(parse_digit("12"), None);
    assert_eq!(parse_digit("banana"), None);
}

/// Scenario: the primary throws, the secondary answers with two frames.
/// The buffer keeps their order and playback crossfades between them.
#[test]
fn fallback_preserves_frame_order_and_crossfades() {
    let (primary, primary_calls) = StubSource::new("remote", Script::Fail);
    let (secondary, _) = StubSource::new("local", Script::Frames(vec![10, 20]));

    let cancel = AtomicBool::new(false);
    let frames = fetch_with_fallback(&chain(primary, secondary), 3, &cancel)
        .unwrap()
        .unwrap();
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(frames[0], frame_filled_with(10));
    assert_eq!(frames[1], frame_filled_with(20));

    let mut playback = Playback::new();
    playback.extend(frames);
    for _ in 0..HOLD_DURATION {
        playback.tick();
    }
    let (plan, signal) = playback.tick();
    assert_eq!(signal, TriggerSignal::Disable);
    assert_eq!(playback.current_index(), Some(1));
    // Old frame fading out underneath, new frame fading in on top.
    assert_eq!(plan.previous, Some((0, 250)));
    assert_eq!(plan.current, Some((1, 5)));
}

/// Scenario: both endpoints empty. The secondary is asked exactly once
/// and the chain reports a single terminal failure.
#[test]
fn both_sources_empty_is_one_terminal_failure() {
    let (primary, primary_calls) = StubSource::new("remote", Script::Empty);
    let (secondary, secondary_calls) = StubSource::new("local", Script::Empty);

    let cancel = AtomicBool::new(false);
    let result = fetch_with_fallback(&chain(primary, secondary), 7, &cancel).unwrap();
    assert!(result.is_err());
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
}

/// An empty payload and a hard failure both fall through to the next
/// source in order.
#[test]
fn empty_then_success_uses_second_source() {
    let (primary, _) = StubSource::new("remote", Script::Empty);
    let (secondary, secondary_calls) = StubSource::new("local", Script::Frames(vec![1]));

    let cancel = AtomicBool::new(false);
    let frames = fetch_with_fallback(&chain(primary, secondary), 0, &cancel)
        .unwrap()
        .unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
}

/// A cancelled chain contacts no further sources.
#[test]
fn cancelled_chain_stops_before_next_source() {
    let (primary, primary_calls) = StubSource::new("remote", Script::Frames(vec![1]));
    let (secondary, _) = StubSource::new("local", Script::Empty);

    let cancel = AtomicBool::new(true);
    let result = fetch_with_fallback(&chain(primary, secondary), 4, &cancel);
    assert!(result.is_none());
    assert_eq!(primary_calls.load(Ordering::SeqCst), 0);
}

/// The worker thread delivers its result through the polled channel.
#[test]
fn fetch_task_delivers_frames_to_poller() {
    let (primary, _) = StubSource::new("remote", Script::Fail);
    let (secondary, _) = StubSource::new("local", Script::Frames(vec![42]));

    let task = FetchTask::spawn(chain(primary, secondary), 9);
    assert_eq!(task.digit(), 9);

    let mut polls = 0;
    let result = loop {
        if let Some(result) = task.poll() {
            break result;
        }
        polls += 1;
        assert!(polls < 1000, "fetch task never completed");
        thread::sleep(Duration::from_millis(1));
    };
    match result {
        FetchResult::Frames(frames) => assert_eq!(frames, vec![frame_filled_with(42)]),
        _ => panic!("expected frames"),
    }
}

/// Growing the buffer mid-playback resumes advancing from the frame
/// that was waiting.
#[test]
fn frames_appended_while_waiting_are_played() {
    let mut playback = Playback::new();
    playback.extend(vec![frame_filled_with(1)]);

    for _ in 0..HOLD_DURATION + 10 {
        playback.tick();
    }
    assert_eq!(playback.current_index(), Some(0));

    playback.extend(vec![frame_filled_with(2)]);
    let (_, signal) = playback.tick();
    assert_eq!(signal, TriggerSignal::Disable);
    assert_eq!(playback.current_index(), Some(1));
    assert_eq!(playback.frame(1), &frame_filled_with(2));
}
