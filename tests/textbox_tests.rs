/// Textbox integration tests — full display sequences end to end.

use std::cell::RefCell;
use std::rc::Rc;

use textbox_engine::core::audio::{AudioSink, NullAudio};
use textbox_engine::core::sequencer::{DisplayError, Textbox, DEFAULT_CHAR_INTERVAL};

const DT: f32 = DEFAULT_CHAR_INTERVAL;

/// Records every blip so tests can assert on the audio cadence.
#[derive(Clone, Default)]
struct RecordingAudio {
    blips: Rc<RefCell<Vec<(f32, f32)>>>,
}

impl AudioSink for RecordingAudio {
    fn play_blip(&mut self, pitch: f32, volume: f32) {
        self.blips.borrow_mut().push((pitch, volume));
    }
}

fn silent_box() -> Textbox {
    Textbox::builder()
        .char_interval(DT)
        .seed(42)
        .audio(NullAudio)
        .build()
        .unwrap()
}

/// Tick the box to idle, collecting each distinct buffer state in order.
fn run_until_idle(textbox: &mut Textbox) -> Vec<String> {
    let mut states = Vec::new();
    let mut ticks = 0;
    while textbox.is_active() {
        textbox.tick(DT);
        if states.last().map(String::as_str) != Some(textbox.visible_text()) {
            states.push(textbox.visible_text().to_string());
        }
        ticks += 1;
        assert!(ticks < 100_000, "sequence never settled back to idle");
    }
    states
}

#[test]
fn pages_reveal_strictly_in_order() {
    let mut textbox = silent_box();
    textbox.display(&["Hi", "<<shout>>!"]).unwrap();
    let states = run_until_idle(&mut textbox);
    assert_eq!(
        states,
        vec!["H", "Hi", "", "<shout>", "<shout>!", ""],
        "page 2 must start only after page 1 cleared the buffer"
    );
}

#[test]
fn tag_is_never_partially_visible() {
    let mut textbox = silent_box();
    textbox.display(&["a<<bold>>c"]).unwrap();
    let states = run_until_idle(&mut textbox);
    assert_eq!(states, vec!["a", "a<bold>", "a<bold>c", ""]);
    assert!(!states.iter().any(|s| s == "a<b"));
}

#[test]
fn completion_callback_fires_exactly_once() {
    let calls = Rc::new(RefCell::new(0u32));
    let mut textbox = silent_box();

    let calls_in = Rc::clone(&calls);
    textbox
        .display_then(&["one", "two", "three"], move || {
            *calls_in.borrow_mut() += 1;
        })
        .unwrap();

    run_until_idle(&mut textbox);
    assert_eq!(*calls.borrow(), 1);

    // Extra ticks after idle must not re-fire it.
    for _ in 0..50 {
        textbox.tick(DT);
    }
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn callback_fires_only_after_the_last_page_settles() {
    let done = Rc::new(RefCell::new(false));
    let mut textbox = silent_box();

    let done_in = Rc::clone(&done);
    textbox
        .display_then(&["ab"], move || *done_in.borrow_mut() = true)
        .unwrap();

    while textbox.is_active() {
        if !textbox.visible_text().is_empty() || textbox.is_revealing() {
            assert!(!*done.borrow(), "callback fired while a page was live");
        }
        textbox.tick(DT);
    }
    assert!(*done.borrow());
}

#[test]
fn empty_page_completes_without_appending() {
    let done = Rc::new(RefCell::new(false));
    let audio = RecordingAudio::default();
    let mut textbox = Textbox::builder()
        .char_interval(DT)
        .audio(audio.clone())
        .build()
        .unwrap();

    let done_in = Rc::clone(&done);
    textbox
        .display_then(&[""], move || *done_in.borrow_mut() = true)
        .unwrap();

    let states = run_until_idle(&mut textbox);
    assert!(states.iter().all(|s| s.is_empty()));
    assert!(*done.borrow());
    assert!(audio.blips.borrow().is_empty());
}

#[test]
fn second_display_while_active_has_no_observable_effect() {
    let first = Rc::new(RefCell::new(0u32));
    let second = Rc::new(RefCell::new(0u32));
    let mut textbox = silent_box();

    let first_in = Rc::clone(&first);
    textbox
        .display_then(&["x"], move || *first_in.borrow_mut() += 1)
        .unwrap();
    textbox.tick(DT);
    assert_eq!(textbox.visible_text(), "x");

    let second_in = Rc::clone(&second);
    let err = textbox
        .display_then(&["y"], move || *second_in.borrow_mut() += 1)
        .unwrap_err();
    assert!(matches!(err, DisplayError::Busy));
    assert_eq!(textbox.visible_text(), "x");

    let states = run_until_idle(&mut textbox);
    assert!(!states.iter().any(|s| s.contains('y')));
    assert_eq!(*first.borrow(), 1);
    assert_eq!(*second.borrow(), 0);
}

#[test]
fn callback_fires_once_per_display_call() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut textbox = silent_box();

    for label in ["first", "second"] {
        let calls_in = Rc::clone(&calls);
        textbox
            .display_then(&["pg"], move || calls_in.borrow_mut().push(label))
            .unwrap();
        run_until_idle(&mut textbox);
    }

    assert_eq!(*calls.borrow(), vec!["first", "second"]);
}

#[test]
fn blips_play_on_every_other_step_with_jittered_pitch() {
    let audio = RecordingAudio::default();
    let mut textbox = Textbox::builder()
        .char_interval(DT)
        .seed(7)
        .audio(audio.clone())
        .build()
        .unwrap();

    textbox.display(&["abcd"]).unwrap();
    run_until_idle(&mut textbox);

    let blips = audio.blips.borrow();
    assert_eq!(blips.len(), 2, "steps a and c blip, b and d do not");
    for &(pitch, volume) in blips.iter() {
        assert!((0.9..1.0).contains(&pitch));
        assert_eq!(volume, 1.0);
    }
}

#[test]
fn whole_tag_counts_as_one_step_for_the_blip_cadence() {
    let audio = RecordingAudio::default();
    let mut textbox = Textbox::builder()
        .char_interval(DT)
        .seed(7)
        .audio(audio.clone())
        .build()
        .unwrap();

    // Steps: '<shout>' (blip), '!' (silent)
    textbox.display(&["<<shout>>!"]).unwrap();
    run_until_idle(&mut textbox);
    assert_eq!(audio.blips.borrow().len(), 1);
}

#[test]
fn sequence_is_deterministic_for_a_seed() {
    let run = |seed: u64| {
        let audio = RecordingAudio::default();
        let mut textbox = Textbox::builder()
            .char_interval(DT)
            .seed(seed)
            .audio(audio.clone())
            .build()
            .unwrap();
        textbox.display(&["clatter"]).unwrap();
        run_until_idle(&mut textbox);
        let pitches: Vec<f32> = audio.blips.borrow().iter().map(|&(p, _)| p).collect();
        pitches
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn liveness_active_flag_always_returns_to_idle() {
    let mut textbox = silent_box();
    // Mix of empty, tagged, and plain pages.
    textbox
        .display(&["", "a<<b>>c", "end"])
        .unwrap();
    run_until_idle(&mut textbox);
    assert!(!textbox.is_active());
    assert!(!textbox.is_revealing());
    assert_eq!(textbox.visible_text(), "");
}
