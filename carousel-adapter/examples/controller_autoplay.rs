use carousel::{Extensions, Kind, Settings};
use carousel_adapter::{Breakpoints, Controller, Key, Pointer, topics};

fn main() {
    // Example: a responsive, autoplaying carousel driven without any UI objects.
    //
    // An adapter would:
    // - report viewport sizes and input events to the controller
    // - call tick(now_ms) in a frame loop / timer
    // - apply `transform()` / `transition()` to the real track element (if any)
    let settings = Settings::new(Kind::Carousel)
        .with_per_view(3)
        .with_autoplay(Some(1_000));
    let mut c = Controller::new(settings, 8).with_breakpoints(
        Breakpoints::new()
            .with(480.0, |s| s.per_view = 1)
            .with(800.0, |s| s.per_view = 2),
    );
    c.on_viewport_size(1_200.0);
    c.mount(Extensions::new(), 0);

    c.carousel().on(topics::AUTOPLAY, |_| println!("  autoplay step"));

    let mut now_ms = 0u64;
    while now_ms < 3_000 {
        now_ms += 16;
        c.tick(now_ms);
    }
    println!(
        "after autoplay: index={} transform={}",
        c.carousel().index(),
        c.carousel().transform()
    );

    c.on_viewport_size(600.0);
    println!(
        "resized: per_view={} item_width={}",
        c.carousel().settings().per_view,
        c.carousel().geometry().item_width
    );

    // A swipe to the left, then a key press once it has settled.
    c.on_pointer_down(400.0, 10.0, Pointer::Touch, now_ms);
    c.on_pointer_move(250.0, 12.0);
    let swiped = c.on_pointer_up(200.0, 12.0, now_ms);
    println!("swipe: {swiped:?} index={}", c.carousel().index());

    now_ms += 500;
    c.tick(now_ms);
    let keyed = c.on_key(Key::End);
    println!("key End: {keyed:?} index={}", c.carousel().index());
}
