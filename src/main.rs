use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::{Serialize, Deserialize};

use zplane::{
    evaluate_contour_integral, evaluate_contours, evaluate_domain_coloring,
    evaluate_surface3d, export_png, is_valid, parse,
    ContourConfig, ContourEntry, DomainColoringConfig, PlotState, Projection,
    Region, Surface3DConfig, spawn_visualizer,
};

/// Everything the session needs to be saved and shared as JSON.
#[derive(Serialize, Deserialize)]
struct PlotConfig {
    function: String,
    region: Region,
    resolution: usize,
    contours: Vec<ContourEntry>,
}

impl PlotConfig {
    fn new() -> Self {
        PlotConfig {
            function: "z".to_string(),
            region: Region::new(-2.0, 2.0, -2.0, 2.0),
            resolution: 101,
            contours: Vec::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PlotConfig::new();
    let mut next_contour_id: u32 = 1;

    let state = Arc::new(Mutex::new(PlotState {
        expression: config.function.clone(),
        region: config.region,
    }));
    let mut window_open = false;

    println!("\n╭──────────────────────────────────────────────╮");
    println!("│        zplane - complex function plots       │");
    println!("│                                              │");
    println!("│ type an expression in z to set the function  │");
    println!("│                                              │");
    println!("│ /show               - open the plot window   │");
    println!("│ /region a b c d     - set x/y window         │");
    println!("│ /res n              - set grid resolution    │");
    println!("│ /grid  /surface     - sample value grids     │");
    println!("│ /contour a b n expr - add a contour          │");
    println!("│ /contours           - sample all contours    │");
    println!("│ /integral id        - integrate f along one  │");
    println!("│ /png path           - export domain coloring │");
    println!("│ /save path  /load path  /quit                │");
    println!("╰──────────────────────────────────────────────╯\n");

    loop {
        print!("zplane: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() { continue; }

        if !input.starts_with('/') {
            match parse(input) {
                Ok(_) => {
                    config.function = input.to_string();
                    state.lock().unwrap().expression = config.function.clone();
                    println!("✓ f(z) = {}\n", config.function);
                }
                Err(e) => println!("parse error: {}\n", e),
            }
            continue;
        }

        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match command {
            "/quit" => break,
            "/show" => {
                if window_open {
                    println!("window already open\n");
                } else {
                    spawn_visualizer(Arc::clone(&state));
                    window_open = true;
                    println!("✓ plot window opened (Escape closes it)\n");
                }
            }
            "/region" => {
                let vals: Vec<f64> = args.iter().filter_map(|s| s.parse().ok()).collect();
                if vals.len() != 4 {
                    println!("usage: /region x_min x_max y_min y_max\n");
                    continue;
                }
                config.region = Region::new(vals[0], vals[1], vals[2], vals[3]);
                state.lock().unwrap().region = config.region;
                println!("✓ region [{}, {}] x [{}, {}]\n", vals[0], vals[1], vals[2], vals[3]);
            }
            "/res" => {
                match args.first().and_then(|s| s.parse::<usize>().ok()) {
                    Some(n) if n > 0 => {
                        config.resolution = n;
                        println!("✓ resolution {}\n", n);
                    }
                    _ => println!("usage: /res n\n"),
                }
            }
            "/grid" => {
                let grid_config = DomainColoringConfig {
                    expression: config.function.clone(),
                    region: config.region,
                    resolution: config.resolution,
                    projection: Projection::Modulus,
                    color_projection: Projection::Argument,
                };
                match evaluate_domain_coloring(&grid_config) {
                    Some(data) => {
                        let n = data.scalar_grid.len();
                        let invalid: usize = data.scalar_grid.iter()
                            .flat_map(|row| row.iter())
                            .filter(|v| v.is_nan())
                            .count();
                        let center = data.scalar_grid[n / 2][n / 2];
                        println!("✓ {}x{} grid, |f| at center {:.4}, {} invalid cell(s)\n",
                            n, n, center, invalid);
                    }
                    None => println!("grid error: expression does not parse\n"),
                }
            }
            "/surface" => {
                let surface_config = Surface3DConfig {
                    expression: config.function.clone(),
                    region: config.region,
                    resolution: config.resolution,
                    height_projection: Projection::Modulus,
                    color_projection: Projection::Argument,
                };
                match evaluate_surface3d(&surface_config) {
                    Some(data) => {
                        println!("✓ surface {}x{}, x axis {:.2}..{:.2}, y axis {:.2}..{:.2}\n",
                            data.height_grid.len(),
                            data.height_grid.first().map(|r| r.len()).unwrap_or(0),
                            data.x_axis.first().unwrap_or(&0.0),
                            data.x_axis.last().unwrap_or(&0.0),
                            data.y_axis.first().unwrap_or(&0.0),
                            data.y_axis.last().unwrap_or(&0.0));
                    }
                    None => println!("surface error: expression does not parse\n"),
                }
            }
            "/contour" => {
                if args.len() < 4 {
                    println!("usage: /contour t_min t_max samples expression\n");
                    continue;
                }
                let t_min: f64 = match args[0].parse() { Ok(v) => v, Err(_) => { println!("bad t_min\n"); continue; } };
                let t_max: f64 = match args[1].parse() { Ok(v) => v, Err(_) => { println!("bad t_max\n"); continue; } };
                let samples: usize = match args[2].parse() { Ok(v) => v, Err(_) => { println!("bad sample count\n"); continue; } };
                let expression = args[3..].join(" ");

                if !is_valid(&expression) {
                    println!("contour expression does not parse\n");
                    continue;
                }

                let entry = ContourEntry {
                    id: next_contour_id,
                    expression,
                    transform: Some(config.function.clone()),
                    t_min,
                    t_max,
                    samples,
                    enabled: true,
                    color: String::new(),
                    speed: 1.0,
                };
                next_contour_id += 1;
                println!("✓ contour #{} g(t) = {} over [{}, {}]\n",
                    entry.id, entry.expression, t_min, t_max);
                config.contours.push(entry);
            }
            "/contours" => {
                if config.contours.is_empty() {
                    println!("no contours yet - add one with /contour\n");
                    continue;
                }
                let contour_config = ContourConfig { contours: config.contours.clone() };
                for data in evaluate_contours(&contour_config) {
                    println!("#{}: {} point(s) over [{:.3}, {:.3}]",
                        data.id, data.points.len(), data.t_min, data.t_max);
                }
                println!();
            }
            "/integral" => {
                let id: u32 = match args.first().and_then(|s| s.parse().ok()) {
                    Some(v) => v,
                    None => { println!("usage: /integral id\n"); continue; }
                };
                let Some(entry) = config.contours.iter().find(|e| e.id == id) else {
                    println!("no contour #{}\n", id);
                    continue;
                };
                // Integrate the current function along the stored curve.
                let mut entry = entry.clone();
                entry.transform = Some(config.function.clone());

                match evaluate_contour_integral(&entry) {
                    Some(result) => {
                        println!("∮ ({}) dz along {} ≈ {:.6} + {:.6}i  ({} sample(s))\n",
                            result.integrand, result.expression,
                            result.value.re, result.value.im,
                            result.t_values.len());
                    }
                    None => println!("nothing computable along contour #{}\n", id),
                }
            }
            "/png" => {
                let Some(path) = args.first() else {
                    println!("usage: /png path\n");
                    continue;
                };
                match export_png(path, &config.function, config.region, 800) {
                    Ok(()) => println!("✓ saved {}\n", path),
                    Err(e) => println!("png error: {}\n", e),
                }
            }
            "/save" => {
                let Some(path) = args.first() else {
                    println!("usage: /save path\n");
                    continue;
                };
                match serde_json::to_string_pretty(&config) {
                    Ok(text) => match fs::write(path, text) {
                        Ok(()) => println!("✓ saved {}\n", path),
                        Err(e) => println!("save error: {}\n", e),
                    },
                    Err(e) => println!("save error: {}\n", e),
                }
            }
            "/load" => {
                let Some(path) = args.first() else {
                    println!("usage: /load path\n");
                    continue;
                };
                match fs::read_to_string(path).map_err(|e| e.to_string())
                    .and_then(|text| serde_json::from_str::<PlotConfig>(&text).map_err(|e| e.to_string()))
                {
                    Ok(loaded) => {
                        next_contour_id = loaded.contours.iter().map(|c| c.id + 1).max().unwrap_or(1);
                        config = loaded;
                        let mut shared = state.lock().unwrap();
                        shared.expression = config.function.clone();
                        shared.region = config.region;
                        println!("✓ loaded {} (f(z) = {})\n", path, config.function);
                    }
                    Err(e) => println!("load error: {}\n", e),
                }
            }
            _ => println!("unknown command {} - see the banner for the list\n", command),
        }
    }

    Ok(())
}
