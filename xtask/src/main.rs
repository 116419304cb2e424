use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use std::sync::Arc;

use tactplot::config::{Margins, PrinterConstraint};
use tactplot::diagram::{ChartLabels, DataPoint, PointList};
use tactplot::rasterize::LiteraryTable;
use tactplot::{
    BarChart, CanvasSettings, CategoricalBarChart, Diagram, PageFormat, RasterCanvas,
    RasterSettings, RasterizerRegistry,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  preview [dir]   Render the sample charts to braille previews");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "preview" => {
            let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
            let out_dir = args
                .get(2)
                .map(|dir| Utf8PathBuf::from(dir.as_str()))
                .unwrap_or_else(|| manifest_dir.join("../target/previews"));
            preview(&out_dir);
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

fn letter() -> CanvasSettings {
    CanvasSettings {
        format: PageFormat::new(216.0, 279.0, Margins::uniform(6.0)),
        constraint: PrinterConstraint::unconstrained(),
        raster: RasterSettings::braille_6dot(),
    }
}

type Sample = (&'static str, CanvasSettings, Box<dyn Diagram + Send + Sync>);

fn samples() -> Vec<Sample> {
    let fruit = BarChart {
        labels: ChartLabels {
            title: Some("Fruit sold".into()),
            x_axis_name: Some("crates".into()),
            y_axis_name: Some("fruit".into()),
        },
        categories: PointList::new(
            "2024",
            vec![
                DataPoint::named("apples", 0.0, 42.0),
                DataPoint::named("pears", 1.0, 17.0),
                DataPoint::named("plums", 2.0, 29.5),
            ],
        ),
    };
    let balance = CategoricalBarChart {
        labels: ChartLabels {
            title: Some("Balance".into()),
            x_axis_name: Some("kEUR".into()),
            y_axis_name: None,
        },
        series_names: vec!["Q1".into(), "Q2".into(), "Q3".into()],
        groups: vec![
            PointList::from_values("north", &[12.0, -4.5, 8.0]),
            PointList::from_values("south", &[-9.0, 3.0]),
            PointList::from_values("east", &[0.0, 15.0, 6.5]),
        ],
    };
    let mut narrow = letter();
    narrow.constraint.width = Some(120.0);

    let mut samples: Vec<Sample> = Vec::new();
    samples.push(("fruit", letter(), Box::new(fruit)));
    samples.push(("balance", letter(), Box::new(balance.clone())));
    samples.push(("balance-narrow", narrow, Box::new(balance)));
    samples
}

fn render(settings: &CanvasSettings, diagram: &dyn Diagram) -> Result<String, String> {
    let canvas = RasterCanvas::new(settings).map_err(|e| e.to_string())?;
    let (cell_width, cell_height) = (canvas.cell_width(), canvas.cell_height());
    let mut registry = RasterizerRegistry::with_default_rasterizers(Arc::new(LiteraryTable));
    registry.set_canvas(canvas);
    registry.rasterize(diagram).map_err(|e| e.to_string())?;
    let canvas = registry
        .take_canvas()
        .ok_or_else(|| "canvas went missing".to_string())?;

    let mut out = String::new();
    for (i, page) in canvas.pages().enumerate() {
        out.push_str(&format!("--- page {} ---\n", i + 1));
        match page.to_braille(cell_width, cell_height) {
            Some(braille) => out.push_str(&braille),
            None => out.push_str(&page.to_ascii()),
        }
        out.push('\n');
    }
    Ok(out)
}

fn preview(out_dir: &Utf8Path) {
    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {}", out_dir, e);
        std::process::exit(1);
    }

    // Sessions share nothing, so each sample renders on its own thread.
    let results: Vec<(&str, Result<String, String>)> = samples()
        .into_par_iter()
        .map(|(name, settings, diagram)| (name, render(&settings, diagram.as_ref())))
        .collect();

    let mut failed = 0;
    for (name, result) in results {
        match result {
            Ok(text) => {
                let path = out_dir.join(format!("{name}.txt"));
                match fs::write(&path, text) {
                    Ok(()) => eprintln!("Wrote {}", path),
                    Err(e) => {
                        eprintln!("Failed to write {}: {}", path, e);
                        failed += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("{name}: {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}
