//! Plot the glide curves selectable from the keyboard
//!
//! Each curve is the frequency heard after jumping from C3 up to C4, with the glide set by touching a different key
//! while holding both octave pads. Look in /images/ for the resulting plot.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/

use plotters::prelude::*;
use touch_synth::{
    button_mask::{ButtonMask, OCTAVE_DOWN, OCTAVE_UP},
    note_table,
    synth_state::SynthState,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // one tick per millisecond
    const NUM_TICKS: u32 = 400;

    const GLIDE_KEYS: [u8; 5] = [0, 1, 3, 6, 12];
    const COLORS: [RGBColor; 5] = [BLACK, BLUE, GREEN, MAGENTA, RED];

    let low_note = note_table::note_freq(2, 0);
    let high_note = note_table::note_freq(2, 12);

    let root = BitMapBackend::new("images/glide_keys_plot.png", (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Glide by key", ("Arial", 20).into_font())
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..NUM_TICKS as f32, (low_note - 10.0)..(high_note + 10.0))?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Frequency (Hz)")
        .draw()?;

    for (glide_key, color) in GLIDE_KEYS.into_iter().zip(COLORS) {
        let mut synth = SynthState::default();

        // dial in the glide, then let go
        synth.tick(
            ButtonMask::new(OCTAVE_UP | OCTAVE_DOWN | (1 << glide_key)),
            0,
        );
        synth.tick(ButtonMask::new(0), 1);

        // settle on the low note
        for t in 2..1_000 {
            synth.tick(ButtonMask::new(1 << 0), t);
        }

        // then jump to the high note
        let points: Vec<(f32, f32)> = (0..NUM_TICKS)
            .map(|t| {
                let out = synth.tick(ButtonMask::new(1 << 12), 1_000 + t);
                (t as f32, out.frequency)
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points, color))?
            .label(format!("key {}", glide_key))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
