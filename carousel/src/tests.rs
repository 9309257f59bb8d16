use crate::pipeline::{Context, FnStage, FocusAlign, Gap, Mirror};
use crate::*;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

type Log = Rc<RefCell<Vec<String>>>;

fn unit_geometry() -> Geometry {
    Geometry {
        item_width: 100.0,
        viewport_width: 100.0,
        gap: 0.0,
        clone_grow: 0.0,
    }
}

fn mounted(settings: Settings, count: usize) -> Carousel {
    let c = Carousel::new(settings, count);
    c.set_geometry(unit_geometry());
    assert!(c.mount(Extensions::new()).is_empty());
    settle(&c);
    c
}

/// Moves the clock far enough for every pending transition hook to fire.
fn settle(c: &Carousel) -> usize {
    let now = c.now_ms() + 10_000;
    c.tick(now)
}

fn run_settled(c: &Carousel, pattern: &str) {
    assert_eq!(c.run(pattern), Ok(true), "run({pattern})");
    settle(c);
}

fn record(c: &Carousel, topics: &[&str]) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for &topic in topics {
        let log = Rc::clone(&log);
        let name = topic.to_string();
        c.on(topic, move |_| log.borrow_mut().push(name.clone()));
    }
    log
}

const RUN_TOPICS: [&str; 6] = [
    topics::RUN_BEFORE,
    topics::RUN,
    topics::RUN_START,
    topics::RUN_END,
    topics::RUN_OFFSET,
    topics::RUN_AFTER,
];

// --- commands ---------------------------------------------------------------------------

#[test]
fn command_patterns_parse_and_display() {
    for pattern in [">", "<", ">3", "<2", ">>", "<<", "=0", "=7", "|>", "|<"] {
        let command: Command = pattern.parse().unwrap();
        assert_eq!(command.to_string(), pattern);
    }

    assert_eq!(">".parse::<Command>().unwrap(), Command::next());
    assert_eq!("<<".parse::<Command>().unwrap(), Command::first());
    assert_eq!("=4".parse::<Command>().unwrap(), Command::to(4));
    assert_eq!("|<".parse::<Command>().unwrap(), Command::prev_page());
}

#[test]
fn malformed_patterns_are_rejected() {
    for pattern in ["", "x", "|", "|3", "=>", "=<", "><", "<>", ">a", "+1"] {
        assert_eq!(
            pattern.parse::<Command>(),
            Err(Error::InvalidCommand {
                pattern: pattern.to_string()
            }),
            "{pattern:?}"
        );
    }
}

#[test]
fn rtl_resolution_mirrors_relative_moves_only() {
    let rtl = TextDirection::Rtl;
    let resolve = |p: &str| rtl.resolve(p.parse().unwrap()).to_string();

    assert_eq!(resolve(">"), "<");
    assert_eq!(resolve("<3"), ">3");
    assert_eq!(resolve(">>"), "<<");
    assert_eq!(resolve("|>"), "|<");
    assert_eq!(resolve("=3"), "=3");
    assert_eq!(TextDirection::Ltr.resolve(Command::next()), Command::next());
}

// --- navigator --------------------------------------------------------------------------

#[test]
fn bounded_slider_last_index_and_paging() {
    let settings = Settings::default()
        .with_per_view(3)
        .with_bound(true)
        .with_focus_at(Focus::Index(0));
    let nav = Navigator::new(&settings, 10);
    assert!(nav.is_bound());
    assert_eq!(nav.last_index(), 7);

    // `>` steps by one, so from 6 it reaches the bounded end without overflowing. Paging is
    // what overshoots 7 (below), which is where the offset flag comes from.
    assert_eq!(
        nav.calculate(6, Command::next()),
        Step {
            index: 7,
            offset: false
        }
    );
    // A page from 6 lands on 9, which is past the bounded end: settle on 7 first.
    assert_eq!(
        nav.calculate(6, Command::next_page()),
        Step {
            index: 7,
            offset: true
        }
    );
    // Already at the bounded end: rewind.
    assert_eq!(
        nav.calculate(7, Command::next_page()),
        Step {
            index: 0,
            offset: true
        }
    );
    assert_eq!(nav.calculate(2, Command::last()).index, 7);
    assert_eq!(nav.calculate(5, Command::first()).index, 0);
}

#[test]
fn bounded_slider_without_rewind_clamps_to_the_bounded_end() {
    let settings = Settings::default()
        .with_per_view(3)
        .with_bound(true)
        .with_rewind(false)
        .with_focus_at(Focus::Index(0));
    let nav = Navigator::new(&settings, 10);
    assert!(nav.is_bound());
    assert_eq!(nav.last_index(), 7);

    assert_eq!(
        nav.calculate(6, Command::next()),
        Step {
            index: 7,
            offset: false
        }
    );
    assert_eq!(
        nav.calculate(6, Command::next_page()),
        Step {
            index: 7,
            offset: true
        }
    );
    // No rewind: stepping past the end stays on it.
    assert_eq!(
        nav.calculate(7, Command::next()),
        Step {
            index: 7,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(0, Command::prev()),
        Step {
            index: 0,
            offset: true
        }
    );
}

#[test]
fn bounded_slider_rewinds_backward_to_the_bounded_end() {
    let settings = Settings::default()
        .with_per_view(3)
        .with_bound(true)
        .with_focus_at(Focus::Index(0));
    let nav = Navigator::new(&settings, 10);

    assert_eq!(
        nav.calculate(0, Command::prev()),
        Step {
            index: 7,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(0, Command::prev_page()),
        Step {
            index: 7,
            offset: true
        }
    );
}

#[test]
fn huge_magnitudes_overflow_the_boundary_without_panicking() {
    let cmd = |pattern: &str| pattern.parse::<Command>().unwrap();

    let slider = Settings::default();
    let nav = Navigator::new(&slider, 5);
    assert_eq!(
        nav.calculate(1, cmd(">9223372036854775808")),
        Step {
            index: 0,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(1, cmd(">18446744073709551615")),
        Step {
            index: 0,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(0, cmd("<18446744073709551615")),
        Step {
            index: 0,
            offset: true
        }
    );
    assert_eq!(nav.calculate(3, cmd("<18446744073709551615")).index, 0);

    let carousel = Settings::new(Kind::Carousel);
    let nav = Navigator::new(&carousel, 5);
    // Saturated steps still move forward and wrap.
    assert_eq!(
        nav.calculate(1, cmd(">9223372036854775807")),
        Step {
            index: 2,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(2, cmd(">18446744073709551615")),
        Step {
            index: 2,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(2, cmd("<18446744073709551615")),
        Step {
            index: 0,
            offset: true
        }
    );

    let c = mounted(Settings::default().with_start_at(1), 5);
    run_settled(&c, ">9223372036854775808");
    assert_eq!(c.index(), 0);

    let c = mounted(Settings::new(Kind::Carousel).with_start_at(1), 5);
    run_settled(&c, ">9223372036854775807");
    assert_eq!(c.index(), 2);
    assert!(!c.is_offset());
}

#[test]
fn centered_focus_is_never_bound() {
    let settings = Settings::default()
        .with_per_view(3)
        .with_bound(true)
        .with_focus_at(Focus::Center);
    let nav = Navigator::new(&settings, 10);
    assert!(!nav.is_bound());
    assert_eq!(nav.last_index(), 9);
}

#[test]
fn slider_pages_snap_to_page_starts() {
    let settings = Settings::default().with_per_view(3);
    let nav = Navigator::new(&settings, 10);

    assert_eq!(nav.calculate(0, Command::next_page()).index, 3);
    assert_eq!(nav.calculate(4, Command::next_page()).index, 6);
    assert_eq!(nav.calculate(4, Command::prev_page()).index, 3);
    assert_eq!(nav.calculate(3, Command::prev_page()).index, 0);

    // Rewinding backwards lands on the last page start.
    assert_eq!(
        nav.calculate(0, Command::prev_page()),
        Step {
            index: 9,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(9, Command::next_page()),
        Step {
            index: 0,
            offset: true
        }
    );
}

#[test]
fn slider_without_rewind_clamps() {
    let settings = Settings::default().with_per_view(3).with_rewind(false);
    let nav = Navigator::new(&settings, 10);

    assert_eq!(
        nav.calculate(9, Command::next_page()),
        Step {
            index: 9,
            offset: true
        }
    );
    assert_eq!(
        nav.calculate(1, Command::prev_page()),
        Step {
            index: 0,
            offset: false
        }
    );
    assert_eq!(
        nav.calculate(0, Command::prev()),
        Step {
            index: 0,
            offset: true
        }
    );
}

#[test]
fn absolute_jumps_are_not_clamped_and_never_offset() {
    let settings = Settings::default();
    let nav = Navigator::new(&settings, 5);
    assert_eq!(
        nav.calculate(1, Command::to(3)),
        Step {
            index: 3,
            offset: false
        }
    );
    assert_eq!(nav.calculate(1, Command::to(12)).index, 12);
}

#[test]
fn empty_collection_keeps_the_index() {
    let settings = Settings::new(Kind::Carousel);
    let nav = Navigator::new(&settings, 0);
    assert_eq!(nav.last_index(), -1);
    assert_eq!(
        nav.calculate(0, Command::next()),
        Step {
            index: 0,
            offset: false
        }
    );
}

#[test]
fn carousel_wraps_around_after_count_steps() {
    let mut rng = Lcg::new(0xC0FFEE);
    for _ in 0..200 {
        let count = rng.gen_range_usize(1, 24);
        let per_view = rng.gen_range_usize(1, 5);
        let start = rng.gen_range_usize(0, count);
        let command = match (rng.gen_bool(), rng.gen_bool()) {
            (true, true) => Command::next(),
            (true, false) => Command::prev(),
            (false, true) => Command::next_page(),
            (false, false) => Command::prev_page(),
        };

        let settings = Settings::new(Kind::Carousel).with_per_view(per_view);
        let nav = Navigator::new(&settings, count);
        let mut index = start;
        for _ in 0..count {
            let step = nav.calculate(index, command);
            assert!(step.index < count, "count={count} command={command}");
            index = step.index;
        }
        assert_eq!(
            index, start,
            "count={count} per_view={per_view} command={command}"
        );
    }
}

// --- run --------------------------------------------------------------------------------

#[test]
fn absolute_jump_is_idempotent() {
    let c = mounted(Settings::default(), 5);
    run_settled(&c, "=2");
    let first = c.state();
    run_settled(&c, "=2");
    assert_eq!(c.index(), 2);
    assert!(!c.is_offset());
    assert_eq!(c.state().index, first.index);
}

#[test]
fn slider_end_clamp_sets_and_clears_offset() {
    let settings = Settings::default().with_rewind(false).with_start_at(4);
    let c = mounted(settings, 5);
    let log = record(&c, &RUN_TOPICS);

    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.index(), 4);
    assert!(c.is_offset());
    assert!(c.is_offset_toward(OffsetKind::Forward));

    settle(&c);
    assert!(!c.is_offset());
    assert_eq!(
        *log.borrow(),
        ["run.before", "run", "run.end", "run.offset", "run.after"]
    );
}

#[test]
fn slider_rewind_publishes_offset_before_after() {
    let c = mounted(Settings::default().with_start_at(4), 5);
    let log = record(&c, &RUN_TOPICS);

    c.run(">").unwrap();
    assert_eq!(c.index(), 0);
    assert_eq!(c.duration(), 800);
    assert_eq!(
        c.transition(),
        alloc::format!("transform 800ms {DEFAULT_TIMING_FUNC}")
    );

    // The animation duration is not enough: an offset slider run uses the rewind duration.
    let now = c.now_ms();
    assert_eq!(c.tick(now + 400), 0);
    assert_eq!(*log.borrow(), ["run.before", "run"]);

    c.tick(now + 800);
    assert_eq!(
        *log.borrow(),
        ["run.before", "run", "run.start", "run.offset", "run.after"]
    );
    assert!(!c.is_offset());
    assert!(!c.is_disabled());
}

#[test]
fn bounded_slider_run_ends_then_reports_the_offset() {
    let settings = Settings::default()
        .with_per_view(3)
        .with_bound(true)
        .with_rewind(false)
        .with_focus_at(Focus::Index(0))
        .with_start_at(6);
    let c = mounted(settings, 10);
    assert_eq!(c.last_index(), 7);
    let log = record(&c, &RUN_TOPICS);

    run_settled(&c, ">");
    assert_eq!(c.index(), 7);
    assert_eq!(*log.borrow(), ["run.before", "run", "run.end", "run.after"]);

    log.borrow_mut().clear();
    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.index(), 7);
    assert!(c.is_offset());
    settle(&c);
    assert_eq!(
        *log.borrow(),
        ["run.before", "run", "run.end", "run.offset", "run.after"]
    );
    assert!(!c.is_offset());
}

#[test]
fn run_end_fires_on_the_last_index() {
    let c = mounted(Settings::default().with_start_at(1), 3);
    let log = record(&c, &RUN_TOPICS);
    run_settled(&c, ">");
    assert_eq!(c.index(), 2);
    assert!(c.is_end());
    assert_eq!(*log.borrow(), ["run.before", "run", "run.end", "run.after"]);
}

#[test]
fn suspended_run_is_ignored() {
    let c = mounted(Settings::default(), 5);
    let log = record(&c, &[topics::RUN_BEFORE]);

    assert_eq!(c.run(">"), Ok(true));
    assert!(c.is_disabled());
    assert_eq!(c.run(">"), Ok(false));
    assert_eq!(c.index(), 1);
    assert_eq!(log.borrow().len(), 1);

    settle(&c);
    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.index(), 2);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn without_wait_for_transition_runs_are_not_suspended() {
    let c = mounted(Settings::default().with_wait_for_transition(false), 5);
    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.index(), 2);
}

#[test]
fn invalid_pattern_leaves_state_untouched() {
    let c = mounted(Settings::default().with_start_at(2), 5);
    let log = record(&c, &RUN_TOPICS);
    let before = c.state();

    assert_eq!(
        c.run("|3"),
        Err(Error::InvalidCommand {
            pattern: "|3".to_string()
        })
    );
    assert_eq!(c.state(), before);
    assert!(log.borrow().is_empty());
    assert_eq!(c.pending_callbacks(), 0);
}

#[test]
fn state_is_mutated_before_each_publish() {
    let c = mounted(Settings::default().with_start_at(1), 5);
    let seen: Rc<RefCell<Vec<(&'static str, usize, Option<Command>)>>> =
        Rc::new(RefCell::new(Vec::new()));

    for topic in [topics::RUN_BEFORE, topics::RUN] {
        let seen = Rc::clone(&seen);
        let weak = c.downgrade();
        c.on(topic, move |event| {
            if let Some(c) = weak.upgrade() {
                seen.borrow_mut()
                    .push((topic, c.index(), c.state().last_move));
                assert_eq!(event.command(), c.state().last_move);
            }
        });
    }

    c.run(">").unwrap();
    assert_eq!(
        *seen.borrow(),
        [
            (topics::RUN_BEFORE, 1, Some(Command::next())),
            (topics::RUN, 2, Some(Command::next())),
        ]
    );
}

#[test]
fn set_index_validates_range() {
    let c = Carousel::new(Settings::default(), 3);
    assert_eq!(c.set_index(2), Ok(()));
    assert_eq!(c.index(), 2);
    assert_eq!(
        c.set_index(3),
        Err(Error::IndexOutOfRange { index: 3, count: 3 })
    );
    assert_eq!(c.index(), 2);
}

#[test]
fn explicit_disable_blocks_until_enabled() {
    let c = mounted(Settings::default(), 5);
    c.disable();
    assert_eq!(c.run(">"), Ok(false));
    assert_eq!(c.index(), 0);
    c.enable();
    assert_eq!(c.run(">"), Ok(true));
    assert_eq!(c.index(), 1);
}

// --- move / translate -------------------------------------------------------------------

#[test]
fn run_commits_translate_and_move_events() {
    let c = mounted(Settings::default(), 5);
    let moves: Rc<RefCell<Vec<(String, f32)>>> = Rc::new(RefCell::new(Vec::new()));
    for topic in [topics::MOVE, topics::MOVE_AFTER] {
        let moves = Rc::clone(&moves);
        c.on(topic, move |event| {
            if let Some(value) = event.movement() {
                moves.borrow_mut().push((topic.to_string(), value));
            }
        });
    }

    run_settled(&c, "=3");
    assert_eq!(c.translate(), 300.0);
    assert_eq!(c.transform(), "translate3d(-300px, 0px, 0px)");
    assert_eq!(
        *moves.borrow(),
        [("move".to_string(), 300.0), ("move.after".to_string(), 300.0)]
    );
}

#[test]
fn nudge_offsets_without_transition() {
    let c = mounted(Settings::default().with_start_at(1), 5);
    c.run("=1").unwrap();
    settle(&c);
    assert!(!c.is_transition_disabled());

    c.nudge(30.0);
    assert_eq!(c.nudge_value(), 30.0);
    assert_eq!(c.movement(), 70.0);
    assert_eq!(c.translate(), 70.0);
    assert!(c.is_transition_disabled());
    assert_eq!(
        c.transition(),
        alloc::format!("transform 0ms {DEFAULT_TIMING_FUNC}")
    );

    // The next run resets the nudge.
    c.run("=1").unwrap();
    assert_eq!(c.nudge_value(), 0.0);
    assert_eq!(c.translate(), 100.0);
}

#[test]
fn rtl_nudge_adds_and_mirror_negates() {
    let settings = Settings::default()
        .with_start_at(1)
        .with_direction(TextDirection::Rtl);
    let c = mounted(settings, 5);
    assert_eq!(c.translate(), -100.0);

    c.nudge(30.0);
    assert_eq!(c.movement(), 130.0);
    assert_eq!(c.translate(), -130.0);
}

#[test]
fn carousel_forward_wrap_jumps_back_silently() {
    let settings = Settings::new(Kind::Carousel).with_start_at(4);
    let c = mounted(settings, 5);
    let log = record(&c, &[topics::TRANSLATE_JUMP, topics::RUN_OFFSET]);

    c.run(">").unwrap();
    assert_eq!(c.index(), 0);
    // Animates one view past the last real item, into the trailing clones.
    assert_eq!(c.translate(), 500.0);
    assert_eq!(c.duration(), 400);

    settle(&c);
    assert_eq!(*log.borrow(), ["translate.jump", "run.offset"]);
    assert_eq!(c.translate(), 0.0);
    assert!(c.is_transition_disabled());
}

#[test]
fn carousel_backward_wrap_jumps_back_silently() {
    let c = mounted(Settings::new(Kind::Carousel), 5);

    c.run("<").unwrap();
    assert_eq!(c.index(), 4);
    assert!(c.is_offset_toward(OffsetKind::Backward));
    assert!(!c.is_offset_toward(OffsetKind::Forward));
    // Animates one view before the first real item, into the leading clones.
    assert_eq!(c.translate(), -100.0);

    settle(&c);
    assert_eq!(c.translate(), 400.0);
}

#[test]
fn carousel_page_wrap_travels_a_whole_view() {
    let settings = Settings::new(Kind::Carousel).with_per_view(2).with_start_at(4);
    let c = mounted(settings, 5);

    c.run("|>").unwrap();
    assert_eq!(c.index(), 1);
    assert!(c.is_offset_toward(OffsetKind::PageForward));
    // Start index is count + (index - per_view) = 4, travel is two items.
    assert_eq!(c.translate(), 600.0);

    settle(&c);
    assert_eq!(c.translate(), 100.0);
}

#[test]
fn transform_of_zero_has_no_negative_sign() {
    let c = mounted(Settings::default(), 3);
    assert_eq!(c.transform(), "translate3d(0px, 0px, 0px)");
}

// --- pipeline ---------------------------------------------------------------------------

fn context(settings: &Settings, geometry: Geometry) -> Context<'_> {
    Context {
        settings,
        geometry,
        index: 0,
        count: 10,
    }
}

#[test]
fn gap_stage_adds_crossed_gaps() {
    let settings = Settings::default();
    let geometry = Geometry {
        item_width: 100.0,
        viewport_width: 100.0,
        gap: 10.0,
        clone_grow: 0.0,
    };
    let cx = context(&settings, geometry);
    assert_eq!(Gap.modify(250.0, &cx), 270.0);
    assert_eq!(Gap.modify(0.0, &cx), 0.0);

    let degenerate = context(&settings, Geometry::default());
    assert_eq!(Gap.modify(250.0, &degenerate), 250.0);
}

#[test]
fn standard_chain_composes_in_order() {
    let settings = Settings::new(Kind::Carousel)
        .with_peek(Peek::Split {
            before: 20.0,
            after: 40.0,
        })
        .with_focus_at(Focus::Index(1));
    let geometry = Geometry {
        item_width: 100.0,
        viewport_width: 400.0,
        gap: 10.0,
        clone_grow: 600.0,
    };
    let cx = context(&settings, geometry);
    let pipeline = Pipeline::standard();
    assert_eq!(
        pipeline.names(),
        ["gap", "grow", "peek", "focus", "mirror"]
    );

    // 200 + 2 gaps, + half the clones, - peek before, - one focused slot.
    assert_eq!(pipeline.mutate(200.0, &cx), 200.0 + 20.0 + 300.0 - 20.0 - 110.0);
}

#[test]
fn centered_focus_ignores_peek() {
    let settings = Settings::default()
        .with_peek(Peek::Uniform(50.0))
        .with_focus_at(Focus::Center);
    let geometry = Geometry {
        item_width: 200.0,
        viewport_width: 500.0,
        gap: 0.0,
        clone_grow: 0.0,
    };
    let cx = context(&settings, geometry);
    assert_eq!(Pipeline::standard().mutate(400.0, &cx), 400.0 - 150.0);
}

#[test]
fn pipeline_order_is_load_bearing() {
    let settings = Settings::default()
        .with_direction(TextDirection::Rtl)
        .with_focus_at(Focus::Index(1));
    let geometry = Geometry {
        item_width: 100.0,
        viewport_width: 300.0,
        gap: 10.0,
        clone_grow: 0.0,
    };
    let cx = context(&settings, geometry);

    let focus_then_mirror = Pipeline::from_stages(vec![Box::new(FocusAlign), Box::new(Mirror)]);
    let mirror_then_focus = Pipeline::from_stages(vec![Box::new(Mirror), Box::new(FocusAlign)]);

    assert_eq!(focus_then_mirror.mutate(200.0, &cx), -90.0);
    assert_eq!(mirror_then_focus.mutate(200.0, &cx), -310.0);
}

#[test]
fn custom_stages_run_before_the_mirror() {
    let settings = Settings::default().with_direction(TextDirection::Rtl);
    let cx = context(&settings, unit_geometry());
    let pipeline = Pipeline::with_transformers(vec![Box::new(FnStage::new("shift", |t, _| {
        t + 5.0
    }))]);
    assert_eq!(
        pipeline.names(),
        ["gap", "grow", "peek", "focus", "shift", "mirror"]
    );
    assert_eq!(pipeline.mutate(100.0, &cx), -105.0);
}

#[test]
fn non_finite_stage_is_skipped() {
    let settings = Settings::default();
    let cx = context(&settings, unit_geometry());
    let mut pipeline = Pipeline::from_stages(Vec::new());
    pipeline.push(FnStage::new("nan", |_, _| f32::NAN));
    pipeline.push(FnStage::new("double", |t, _| t * 2.0));

    assert_eq!(pipeline.mutate(10.0, &cx), 20.0);
    assert_eq!(
        pipeline.try_mutate(10.0, &cx),
        Err(Error::NonFiniteStage { stage: "nan" })
    );

    let c = Carousel::new(Settings::default(), 3)
        .with_transformers(vec![Box::new(FnStage::new("inf", |_, _| f32::INFINITY))]);
    c.set_geometry(unit_geometry());
    c.mount(Extensions::new());
    c.run("=2").unwrap();
    assert_eq!(c.translate(), 200.0);
}

#[test]
fn caller_stages_see_the_current_index() {
    let c = mounted(Settings::default(), 5);
    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    c.push_transformer(FnStage::new("inspect", move |t, cx| {
        sink.borrow_mut().push(cx.index);
        t
    }));
    c.run("=3").unwrap();
    assert_eq!(*seen.borrow(), [3]);
}

// --- sizes ------------------------------------------------------------------------------

#[test]
fn geometry_measure_splits_the_viewport() {
    let settings = Settings::default().with_per_view(2).with_gap(10.0);
    let g = Geometry::measure(1010.0, 10, &settings);
    assert_eq!(g.item_width, 500.0);
    assert_eq!(g.clone_grow, 0.0);
    assert_eq!(g.stride(), 510.0);
    assert_eq!(g.track_width(3), 1520.0);

    let peeked = settings.clone().with_peek(Peek::Uniform(50.0));
    assert_eq!(Geometry::measure(1010.0, 10, &peeked).item_width, 450.0);

    let carousel = settings.with_kind(Kind::Carousel);
    assert_eq!(clones_per_side(10, &carousel), 3);
    assert_eq!(clones_per_side(2, &carousel), 2);
    assert_eq!(clones_per_side(0, &carousel), 0);
    assert_eq!(Geometry::measure(1010.0, 10, &carousel).clone_grow, 510.0 * 6.0);
}

#[test]
fn measure_installs_geometry_and_publishes_resize() {
    let c = mounted(Settings::default().with_start_at(2), 5);
    let log = record(&c, &[topics::RESIZE, topics::MOVE]);

    c.measure(500.0);
    assert_eq!(c.geometry().item_width, 500.0);
    assert_eq!(c.translate(), 1000.0 + 2.0 * 10.0);
    assert_eq!(*log.borrow(), ["resize", "move"]);

    // Same geometry: nothing to do.
    c.measure(500.0);
    assert_eq!(log.borrow().len(), 2);
}

// --- transition -------------------------------------------------------------------------

#[test]
fn transition_descriptor_respects_disabled() {
    let mut t = Transition::new();
    assert_eq!(t.compose("transform", 400, "ease"), "transform 400ms ease");
    t.set("transform", 400, "ease");
    assert_eq!(t.descriptor(), "transform 400ms ease");

    t.set_disabled(true);
    assert!(t.is_disabled());
    assert_eq!(t.compose("transform", 400, "ease"), "transform 0ms ease");
    t.remove();
    assert_eq!(t.descriptor(), "");
}

#[test]
fn timers_fire_in_due_then_fifo_order() {
    let log: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let mut timers = Timers::new();
    for (delay, id) in [(50u64, 1u32), (10, 2), (50, 3), (10, 4)] {
        let log = Rc::clone(&log);
        timers.schedule(delay, move || log.borrow_mut().push(id));
    }
    assert_eq!(timers.len(), 4);

    timers.advance(10);
    while let Some(cb) = timers.pop_due() {
        cb();
    }
    assert_eq!(*log.borrow(), [2, 4]);

    // The clock never goes backwards.
    timers.advance(5);
    assert_eq!(timers.now_ms(), 10);

    timers.advance(60);
    while let Some(cb) = timers.pop_due() {
        cb();
    }
    assert_eq!(*log.borrow(), [2, 4, 1, 3]);
    assert!(timers.is_empty());
}

#[test]
fn mount_applies_position_without_transition() {
    let c = Carousel::new(Settings::default().with_start_at(2), 5);
    c.set_geometry(unit_geometry());
    assert!(!c.is_mounted());
    assert_eq!(c.transition(), "");

    c.mount(Extensions::new());
    assert!(c.is_mounted());
    assert_eq!(c.translate(), 200.0);
    assert_eq!(
        c.transition(),
        alloc::format!("transform 0ms {DEFAULT_TIMING_FUNC}")
    );
}

// --- bus --------------------------------------------------------------------------------

#[test]
fn bus_fans_out_in_subscription_order() {
    let bus: EventBus = EventBus::new();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    let a = {
        let log = Rc::clone(&log);
        bus.subscribe(&["x", "y"], move |_| log.borrow_mut().push("a".to_string()))
    };
    {
        let log = Rc::clone(&log);
        bus.subscribe("x", move |_| log.borrow_mut().push("b".to_string()));
    }

    bus.emit("x");
    assert_eq!(*log.borrow(), ["a", "b"]);
    bus.emit(&["y", "nobody"]);
    assert_eq!(*log.borrow(), ["a", "b", "a"]);

    a.unsubscribe();
    a.unsubscribe();
    assert_eq!(bus.listener_count("x"), 1);
    assert_eq!(bus.listener_count("y"), 0);
    bus.emit("x");
    assert_eq!(*log.borrow(), ["a", "b", "a", "b"]);
}

#[test]
fn bus_allows_reentrant_subscribe_and_publish() {
    let bus: EventBus = EventBus::new();
    let hits = Rc::new(RefCell::new(0u32));

    let inner_bus = bus.clone();
    let inner_hits = Rc::clone(&hits);
    bus.subscribe("outer", move |_| {
        let hits = Rc::clone(&inner_hits);
        inner_bus.subscribe("inner", move |_| *hits.borrow_mut() += 1);
        inner_bus.emit("inner");
    });

    bus.emit("outer");
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(bus.listener_count("inner"), 1);
}

#[test]
fn bus_passes_payloads_through() {
    let bus: EventBus<u32> = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe("n", move |n: &u32| sink.borrow_mut().push(*n));
    bus.publish("n", &7);
    bus.emit("n");
    assert_eq!(*seen.borrow(), [7, 0]);
}

#[test]
fn subscription_outliving_the_bus_is_harmless() {
    let bus: EventBus = EventBus::new();
    let sub = bus.subscribe("x", |_| {});
    assert_eq!(sub.topics().collect::<Vec<_>>(), ["x"]);
    drop(bus);
    sub.unsubscribe();
}

// --- mount ------------------------------------------------------------------------------

struct Probe {
    name: &'static str,
    sibling: &'static str,
    components: Components,
    log: Log,
}

impl Component for Probe {
    fn init(&self) {
        let found = self.components.get::<Probe>(self.sibling).is_some();
        self.log
            .borrow_mut()
            .push(alloc::format!("init:{}:{found}", self.name));
    }
}

fn peer_factory<O: 'static>(
    name: &'static str,
    sibling: &'static str,
    log: &Log,
) -> impl FnOnce(&O, &Components, &EventBus) -> Result<Instance, Error> + 'static {
    let log = Rc::clone(log);
    move |_: &O, components: &Components, _: &EventBus| {
        log.borrow_mut().push(alloc::format!("create:{name}"));
        Ok(Instance::new(Probe {
            name,
            sibling,
            components: components.clone(),
            log,
        }))
    }
}

#[test]
fn mount_is_two_phase_regardless_of_order() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let factories = Factories::<()>::new()
        .with("a", peer_factory("a", "b", &log))
        .with("b", peer_factory("b", "a", &log));

    let (components, skipped) = mount::mount(&(), factories, &EventBus::new());
    assert!(skipped.is_empty());
    assert_eq!(components.names(), ["a", "b"]);
    assert_eq!(
        *log.borrow(),
        ["create:a", "create:b", "init:a:true", "init:b:true"]
    );
    assert!(components.get::<Probe>("a").is_some());
    assert!(components.get::<Probe>("missing").is_none());
}

#[test]
fn mount_skips_duplicates_and_failing_factories() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let factories = Factories::<()>::new()
        .with("a", peer_factory("a", "c", &log))
        .with("a", peer_factory("dup", "a", &log))
        .with("bad", |_: &(), _: &Components, _: &EventBus| {
            Err(Error::InvalidPerView)
        })
        .with("c", peer_factory("c", "a", &log));

    let (components, skipped) = mount::mount(&(), factories, &EventBus::new());
    assert_eq!(components.names(), ["a", "c"]);
    assert_eq!(
        skipped,
        [
            Error::DuplicateComponent {
                name: "a".to_string()
            },
            Error::ComponentFactory {
                name: "bad".to_string(),
                reason: Error::InvalidPerView.to_string(),
            },
        ]
    );
    assert_eq!(
        *log.borrow(),
        ["create:a", "create:c", "init:a:true", "init:c:true"]
    );
}

#[test]
fn carousel_mount_publishes_around_both_passes() {
    let c = Carousel::new(Settings::default(), 3);
    let log = record(&c, &[topics::MOUNT_BEFORE, topics::MOUNT_AFTER]);

    let factories = Extensions::new().with("counter", {
        let log = Rc::clone(&log);
        move |carousel: &Carousel, _: &Components, bus: &EventBus| {
            log.borrow_mut().push("create:counter".to_string());
            assert_eq!(carousel.count(), 3);
            let hits = Rc::new(RefCell::new(0u32));
            let sink = Rc::clone(&hits);
            bus.subscribe(topics::RUN, move |_| *sink.borrow_mut() += 1);
            Ok(Instance::from_rc(Rc::new(Counter { hits })))
        }
    });

    assert!(c.mount(factories).is_empty());
    assert_eq!(
        *log.borrow(),
        ["mount.before", "create:counter", "mount.after"]
    );

    c.run(">").unwrap();
    let counter = c.components().get::<Counter>("counter").unwrap();
    assert_eq!(*counter.hits.borrow(), 1);
}

struct Counter {
    hits: Rc<RefCell<u32>>,
}

impl Component for Counter {}

// --- lifecycle --------------------------------------------------------------------------

#[test]
fn update_settings_moves_to_new_start_and_publishes_update() {
    let c = mounted(Settings::default(), 5);
    let log = record(&c, &[topics::UPDATE]);

    c.update_settings(|s| s.gap = 4.0);
    assert_eq!(c.index(), 0);
    c.update_settings(|s| s.start_at = 3);
    assert_eq!(c.index(), 3);
    assert_eq!(c.translate(), 300.0);
    assert_eq!(log.borrow().len(), 2);

    c.update_settings(|s| s.per_view = 0);
    assert_eq!(c.settings().per_view, 1);
}

#[test]
fn zero_per_view_falls_back_to_one() {
    let mut settings = Settings::default();
    assert_eq!(settings.set_per_view(0), Err(Error::InvalidPerView));
    assert_eq!(Settings::default().with_per_view(0).per_view, 1);

    settings.per_view = 0;
    assert_eq!(settings.validate(), Err(Error::InvalidPerView));
    let c = Carousel::new(settings, 4);
    assert_eq!(c.settings().per_view, 1);
}

#[test]
fn focus_parses_from_text() {
    let mut settings = Settings::default();
    settings.set_focus_at("center").unwrap();
    assert_eq!(settings.focus_at, Focus::Center);
    settings.set_focus_at("2").unwrap();
    assert_eq!(settings.focus_at, Focus::Index(2));
    assert_eq!(
        settings.set_focus_at("middle"),
        Err(Error::InvalidFocus {
            value: "middle".to_string()
        })
    );
    assert_eq!(settings.focus_at, Focus::Index(2));
}

#[test]
fn destroy_drops_listeners_components_and_timers() {
    let c = Carousel::new(Settings::default(), 3);
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let factories = Extensions::new().with("a", peer_factory("a", "a", &log));
    c.mount(factories);
    let destroyed = record(&c, &[topics::DESTROY]);
    c.run(">").unwrap();
    assert!(c.pending_callbacks() > 0);

    c.destroy();
    assert_eq!(*destroyed.borrow(), ["destroy"]);
    assert_eq!(c.bus().listener_count(topics::DESTROY), 0);
    assert!(c.components().is_empty());
    assert_eq!(c.pending_callbacks(), 0);
    assert!(!c.is_mounted());
}

#[test]
fn weak_handle_does_not_keep_the_instance_alive() {
    let c = Carousel::new(Settings::default(), 3);
    let weak = c.downgrade();
    assert!(weak.upgrade().is_some());
    drop(c);
    assert!(weak.upgrade().is_none());
}

#[cfg(feature = "serde")]
#[test]
fn settings_round_trip_through_json() {
    let settings = Settings::new(Kind::Carousel)
        .with_per_view(3)
        .with_focus_at(Focus::Center)
        .with_peek(Peek::Split {
            before: 20.0,
            after: 40.0,
        })
        .with_autoplay(Some(3000));
    let json = serde_json::to_string(&settings).unwrap();
    let back: Settings = serde_json::from_str(&json).unwrap();
    assert_eq!(back, settings);

    let value = serde_json::to_value(Settings::default().with_focus_at(Focus::Index(2))).unwrap();
    assert_eq!(value["focus_at"], serde_json::json!(2));
    let value = serde_json::to_value(Settings::default().with_focus_at(Focus::Center)).unwrap();
    assert_eq!(value["focus_at"], serde_json::json!("center"));

    let focused: Settings = serde_json::from_str(r#"{"focus_at":3}"#).unwrap();
    assert_eq!(focused.focus_at, Focus::Index(3));
    let centered: Settings = serde_json::from_str(r#"{"focus_at":"center"}"#).unwrap();
    assert_eq!(centered.focus_at, Focus::Center);
    assert!(serde_json::from_str::<Settings>(r#"{"focus_at":"middle"}"#).is_err());

    let partial: Settings = serde_json::from_str(r#"{"kind":"carousel","per_view":2}"#).unwrap();
    assert!(partial.is_carousel());
    assert_eq!(partial.per_view, 2);
    assert_eq!(partial.animation_duration, 400);
}
