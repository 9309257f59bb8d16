// Example: a looping carousel driven by a fake clock.
use carousel::{Carousel, Extensions, Kind, Settings, topics};

fn main() {
    let settings = Settings::new(Kind::Carousel).with_per_view(2).with_gap(8.0);
    let c = Carousel::new(settings, 6);
    c.measure(808.0);
    c.mount(Extensions::new());

    c.on(&[topics::RUN, topics::RUN_OFFSET], |event| {
        println!("  event: {event:?}");
    });

    let mut now_ms = 0u64;
    for pattern in [">", "|>", "|>", "=1", "<<", "<"] {
        let accepted = c.run(pattern).unwrap_or(false);
        println!(
            "run({pattern}) accepted={accepted} index={} offset={} transform={}",
            c.index(),
            c.is_offset(),
            c.transform()
        );

        // Drive the clock until the transition hook has fired.
        while c.pending_callbacks() > 0 {
            now_ms += 16;
            c.tick(now_ms);
        }
        println!("  settled: transform={}", c.transform());
    }
}
