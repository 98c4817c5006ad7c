use minifb::{Window, WindowOptions, Key};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::eval::{compile_str, CompiledExpr};
use crate::grid::Region;
use crate::math::C;

const WIDTH: usize = 600;
const HEIGHT: usize = 600;

/// Shared state between the REPL and the plot window.
pub struct PlotState {
    pub expression: String,
    pub region: Region,
}

// Simple 3x5 pixel font
fn draw_char(buffer: &mut [u32], x: usize, y: usize, ch: char, color: u32) {
    let pattern: &[u8] = match ch {
        '0' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => &[0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => &[0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => &[0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => &[0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => &[0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => &[0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => &[0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => &[0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => &[0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => &[0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => &[0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => &[0b000, 0b000, 0b000, 0b000, 0b000],
        '(' => &[0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => &[0b100, 0b010, 0b010, 0b010, 0b100],
        '*' => &[0b000, 0b101, 0b010, 0b101, 0b000],
        '+' => &[0b000, 0b010, 0b111, 0b010, 0b000],
        '/' => &[0b001, 0b001, 0b010, 0b100, 0b100],
        '^' => &[0b010, 0b101, 0b000, 0b000, 0b000],
        '=' => &[0b000, 0b111, 0b000, 0b111, 0b000],
        ',' => &[0b000, 0b000, 0b000, 0b010, 0b100],
        'a' => &[0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => &[0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => &[0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => &[0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => &[0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => &[0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => &[0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => &[0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => &[0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => &[0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => &[0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => &[0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => &[0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => &[0b101, 0b111, 0b111, 0b111, 0b101],
        'o' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => &[0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => &[0b111, 0b101, 0b111, 0b001, 0b001],
        'r' => &[0b110, 0b101, 0b110, 0b101, 0b101],
        's' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        't' => &[0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => &[0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => &[0b101, 0b101, 0b101, 0b101, 0b010],
        'w' => &[0b101, 0b101, 0b111, 0b111, 0b101],
        'x' => &[0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => &[0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => &[0b111, 0b001, 0b010, 0b100, 0b111],
        _ => &[0b000, 0b000, 0b000, 0b000, 0b000],
    };

    for (dy, &row) in pattern.iter().enumerate() {
        if y + dy >= HEIGHT { break; }
        for dx in 0..3 {
            if x + dx >= WIDTH { break; }
            if row & (1 << (2 - dx)) != 0 {
                let idx = (y + dy) * WIDTH + (x + dx);
                buffer[idx] = color;
            }
        }
    }
}

fn draw_text(buffer: &mut [u32], x: usize, y: usize, text: &str, color: u32) {
    let mut offset_x = x;
    for ch in text.chars() {
        if offset_x + 4 >= WIDTH { break; }
        draw_char(buffer, offset_x, y, ch, color);
        offset_x += 4;
    }
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let c = v * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Standard domain coloring: hue from the argument, brightness from the
/// modulus (black at zeros, bright toward poles). Invalid values render
/// mid-gray so singular cells stay visible.
pub(crate) fn domain_color(z: C) -> (u8, u8, u8) {
    if !z.is_finite() {
        return (0x60, 0x60, 0x60);
    }
    let hue = z.arg().to_degrees().rem_euclid(360.0);
    let m = z.abs();
    let value = 1.0 - 1.0 / (1.0 + m.sqrt());
    hsv_to_rgb(hue, 1.0, value)
}

/// Open the plot window on its own thread. It re-renders the current
/// expression from shared state every frame; Escape closes it.
pub fn spawn_visualizer(state: Arc<Mutex<PlotState>>) {
    thread::spawn(move || {
        let mut window = Window::new(
            "zplane - domain coloring",
            WIDTH,
            HEIGHT,
            WindowOptions::default(),
        ).unwrap();

        window.set_target_fps(30);

        let mut buffer: Vec<u32> = vec![0; WIDTH * HEIGHT];

        while window.is_open() && !window.is_key_down(Key::Escape) {
            let (expression, region) = {
                let state = state.lock().unwrap();
                (state.expression.clone(), state.region)
            };

            match compile_str(&expression, "z") {
                Ok(compiled) => render_function(&mut buffer, &compiled, region),
                Err(_) => buffer.fill(0x101018),
            }

            let text_color = 0xFFFFFF;
            draw_text(&mut buffer, 10, 10, &format!("f(z) = {}", expression), text_color);
            draw_text(
                &mut buffer,
                10,
                25,
                &format!("x: {:.2} .. {:.2}", region.x_min, region.x_max),
                text_color,
            );
            draw_text(
                &mut buffer,
                10,
                40,
                &format!("y: {:.2} .. {:.2}", region.y_min, region.y_max),
                text_color,
            );

            window.update_with_buffer(&buffer, WIDTH, HEIGHT).unwrap();
        }
    });
}

fn render_function(buffer: &mut [u32], compiled: &CompiledExpr, region: Region) {
    let dx = (region.x_max - region.x_min) / WIDTH as f64;
    let dy = (region.y_max - region.y_min) / HEIGHT as f64;

    for py in 0..HEIGHT {
        // Top row is y_max so the plot reads like the plane.
        let y = region.y_max - py as f64 * dy;
        for px in 0..WIDTH {
            let x = region.x_min + px as f64 * dx;
            let z = compiled.eval_or_nan(C::new(x, y));
            let (r, g, b) = domain_color(z);
            buffer[py * WIDTH + px] = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
        }
    }
}
