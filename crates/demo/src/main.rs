// File: crates/demo/src/main.rs
// Summary: Demo renders a tool set (trend line, fib, channel, position, brush, ...) to a PNG.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use skia_safe as skia;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use linetool_core::{
    LinearPriceScale, LinearTimeScale, NoMagnet, PaneEnv, PointerEvent, PointerEventKind, SkiaTextMeasurer,
    ToolKind, ToolLayer, ToolPoint,
};

const WIDTH: i32 = 1024;
const HEIGHT: i32 = 640;

#[derive(Clone, Copy, Debug)]
struct Candle {
    t: f64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let candles = match std::env::args().nth(1) {
        Some(path) => load_ohlc_csv(Path::new(&path)).with_context(|| format!("failed to load CSV '{path}'"))?,
        None => synthesize_candles(240),
    };
    anyhow::ensure!(!candles.is_empty(), "no candles loaded");
    println!("Loaded {} candles", candles.len());

    let (min_price, max_price) = price_range(&candles);
    let first_ts = candles[0].t;
    let last_ts = candles[candles.len() - 1].t;
    let step = (last_ts - first_ts) / candles.len() as f64;

    let price_scale = LinearPriceScale::new(0.0, HEIGHT as f64, min_price * 0.98, max_price * 1.02);
    let time_scale =
        LinearTimeScale::new(0.0, WIDTH as f64, first_ts, WIDTH as f64 / (last_ts - first_ts + step));
    let env = PaneEnv {
        price_scale: &price_scale,
        time_scale: &time_scale,
        base_value: 0.0,
        width: WIDTH as f64,
        height: HEIGHT as f64,
        viewport_version: 0,
    };

    let mut layer = ToolLayer::new(Rc::new(SkiaTextMeasurer));
    populate_tools(&mut layer, &candles)?;

    // Exercise the pointer path once: draw a short brush stroke.
    let mut magnet = NoMagnet;
    layer.start_tool(ToolKind::Brush, None)?;
    let stroke = [(80.0, 120.0), (120.0, 90.0), (170.0, 130.0), (230.0, 100.0)];
    for (i, (x, y)) in stroke.iter().enumerate() {
        let kind = if i == 0 { PointerEventKind::MouseDown } else { PointerEventKind::PressedMouseMove };
        layer.handle_event(&env, &mut magnet, &PointerEvent { kind, x: *x, y: *y, shift: false });
    }
    layer.handle_event(
        &env,
        &mut magnet,
        &PointerEvent { kind: PointerEventKind::MouseUp, x: 230.0, y: 100.0, shift: false },
    );
    for event in layer.take_events() {
        println!("after-edit: {:?} ({})", event.stage, event.export.id);
    }

    let mut surface =
        skia::surfaces::raster_n32_premul((WIDTH, HEIGHT)).context("failed to create raster surface")?;
    let canvas = surface.canvas();
    canvas.clear(skia::Color::from_argb(255, 18, 18, 20));
    draw_backdrop(canvas, &candles, &price_scale, &time_scale);
    layer.draw(canvas, &env, 1.0);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image.encode_to_data(skia::EncodedImageFormat::PNG).context("encode PNG failed")?;
    let out = PathBuf::from("target/out/linetools_demo.png");
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, data.as_bytes())?;
    println!("Wrote {}", out.display());

    println!("Export payload:\n{}", layer.export_tools());
    Ok(())
}

fn populate_tools(layer: &mut ToolLayer, candles: &[Candle]) -> Result<()> {
    let n = candles.len();
    let at = |i: usize| candles[i.min(n - 1)];
    let point = |i: usize, price: f64| ToolPoint::new(price, at(i).t);

    layer.add_tool(ToolKind::TrendLine, None, vec![point(n / 8, at(n / 8).l), point(n / 2, at(n / 2).h)])?;
    layer.add_tool(
        ToolKind::Rectangle,
        Some(&serde_json::json!({ "text": { "value": "consolidation" } })),
        vec![point(n / 3, at(n / 3).h * 1.01), point(n / 2, at(n / 2).l * 0.99)],
    )?;
    layer.add_tool(
        ToolKind::FibRetracement,
        None,
        vec![point(n / 2, at(n / 2).l), point(3 * n / 4, at(3 * n / 4).h)],
    )?;
    layer.add_tool(
        ToolKind::ParallelChannel,
        None,
        vec![
            point(n / 6, at(n / 6).c),
            point(n / 2, at(n / 2).c * 1.02),
            point(n / 6, at(n / 6).c * 0.96),
        ],
    )?;
    let entry = at(5 * n / 8).c;
    layer.add_tool(
        ToolKind::LongShortPosition,
        None,
        vec![point(5 * n / 8, entry), point(5 * n / 8, entry * 0.97), point(6 * n / 8, entry * 1.09)],
    )?;
    layer.add_tool(
        ToolKind::Text,
        Some(&serde_json::json!({ "text": { "value": "breakout?" } })),
        vec![point(7 * n / 8, at(7 * n / 8).h * 1.01)],
    )?;
    layer.add_tool(ToolKind::HorizontalLine, None, vec![point(0, at(n - 1).c)])?;
    Ok(())
}

fn draw_backdrop(
    canvas: &skia::Canvas,
    candles: &[Candle],
    price_scale: &LinearPriceScale,
    time_scale: &LinearTimeScale,
) {
    use linetool_core::{PriceScale, TimeScale};

    let mut wick = skia::Paint::default();
    wick.set_anti_alias(true);
    wick.set_style(skia::paint::Style::Stroke);
    wick.set_stroke_width(1.0);

    let mut body = skia::Paint::default();
    body.set_anti_alias(true);

    let bar_px = (WIDTH as f32 / candles.len() as f32).max(3.0) * 0.7;
    for candle in candles {
        let x = time_scale.time_to_coordinate(candle.t) as f32;
        let y_high = price_scale.price_to_coordinate(candle.h, 0.0) as f32;
        let y_low = price_scale.price_to_coordinate(candle.l, 0.0) as f32;
        let y_open = price_scale.price_to_coordinate(candle.o, 0.0) as f32;
        let y_close = price_scale.price_to_coordinate(candle.c, 0.0) as f32;

        let color = if candle.c >= candle.o {
            skia::Color::from_argb(255, 40, 200, 120)
        } else {
            skia::Color::from_argb(255, 220, 80, 80)
        };
        wick.set_color(color);
        body.set_color(color);

        canvas.draw_line((x, y_high), (x, y_low), &wick);
        let half = bar_px * 0.5;
        let top = y_open.min(y_close);
        let bottom = y_open.max(y_close).max(top + 1.0);
        canvas.draw_rect(skia::Rect::from_ltrb(x - half, top, x + half, bottom), &body);
    }
}

fn synthesize_candles(count: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp() as f64;
    let mut candles = Vec::with_capacity(count);
    let mut price = 100.0f64;
    for i in 0..count {
        let t = start + i as f64 * 3600.0;
        let drift = (i as f64 * 0.08).sin() * 1.6 + (i as f64 * 0.013).cos() * 3.0;
        let open = price;
        let close = 100.0 + drift + (i as f64 * 0.37).sin() * 0.8;
        let high = open.max(close) + 0.6;
        let low = open.min(close) - 0.6;
        candles.push(Candle { t, o: open, h: high, l: low, c: close });
        price = close;
    }
    candles
}

fn load_ohlc_csv(path: &Path) -> Result<Vec<Candle>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let index = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (ti, oi, hi, li, ci) = (
        index("time").or_else(|| index("timestamp")).or_else(|| index("date")),
        index("open"),
        index("high"),
        index("low"),
        index("close"),
    );

    let mut candles = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: Option<usize>, fallback: f64| -> f64 {
            i.and_then(|i| record.get(i)).and_then(|v| v.parse().ok()).unwrap_or(fallback)
        };
        candles.push(Candle {
            t: field(ti, row as f64 * 3600.0),
            o: field(oi, 0.0),
            h: field(hi, 0.0),
            l: field(li, 0.0),
            c: field(ci, 0.0),
        });
    }
    Ok(candles)
}

fn price_range(candles: &[Candle]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for candle in candles {
        min = min.min(candle.l);
        max = max.max(candle.h);
    }
    (min, max)
}
