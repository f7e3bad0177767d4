use std::cell::RefCell;
use std::rc::Rc;

use segue::{
    AggregationMethod, AnimationOptions, PlaybackOptions, SharedPlayable, SharedTimeline,
    animate, compose, playback, playback_group,
};

#[derive(Debug, Default)]
struct Shape {
    x: f64,
    y: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let options = AnimationOptions::new("easeInOutQuad");
    let shake: SharedTimeline = Rc::new(
        animate([0.0], 200.0, options.clone())?
            .then_for([10.0], 400.0)?
            .then([-10.0])?,
    );
    let move_to: SharedTimeline = Rc::new(
        animate([0.0, 0.0], 200.0, options)?
            .then_for([200.0, 150.0], 400.0)?
            .then([200.0, 50.0])?,
    );

    let shape = Rc::new(RefCell::new(Shape::default()));
    let mut shake_n_move = playback(
        Rc::new(compose(vec![move_to.clone(), shake.clone()])),
        Rc::clone(&shape),
        PlaybackOptions::default(),
    );
    shake_n_move.on_tick(|values, _, shape| {
        let (Some(position), Some(offset)) = (values.first(), values.get(1)) else {
            return;
        };
        if let (segue::Channel::List(xy), Some(offset)) = (position, offset.as_number()) {
            let mut shape = shape.borrow_mut();
            shape.x = xy.first().and_then(|c| c.as_number()).unwrap_or(0.0) + offset;
            shape.y = xy.get(1).and_then(|c| c.as_number()).unwrap_or(0.0);
        }
    });
    shake_n_move.on_complete(|| println!("shake-n-move complete"));

    let shaker: SharedPlayable = playback(shake, (), PlaybackOptions::default()).into_shared();
    let mover: SharedPlayable = playback(move_to, (), PlaybackOptions::default()).into_shared();
    let mut together = playback_group(vec![shaker, mover], AggregationMethod::Combine, ());
    together.on_tick(|values, time, _| println!("combined at {time:>6.1}: {values:?}"));
    together.on_complete(|| println!("group complete"));

    let frame = 1000.0 / 60.0;
    shake_n_move.start(0.0)?;
    together.start(0.0)?;
    for n in 0..180u32 {
        let now = f64::from(n) * frame;
        if n == 60 {
            shake_n_move.stop(false);
            together.stop(false);
        }
        shake_n_move.tick(now)?;
        together.tick(now)?;
        if n % 15 == 0 {
            println!("frame {n:>3}: {:?}", shape.borrow());
        }
        if !shake_n_move.is_started() && !together.is_started() {
            println!("both finished after {n} frames");
            break;
        }
    }
    Ok(())
}
