//! ASCII banner with a warm gradient (PIXHIVE).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Sunset Coral (#ff6b6b).
const SUNSET_CORAL: (u8, u8, u8) = (0xff, 0x6b, 0x6b);
/// Dusk Violet (#845ef7).
const DUSK_VIOLET: (u8, u8, u8) = (0x84, 0x5e, 0xf7);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the welcome banner: "PIXHIVE" in FIGlet ASCII with a gradient from
/// Sunset Coral to Dusk Violet, then version.
pub fn print_welcome() {
    let mut out = stdout();
    let Some(art) = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("PIXHIVE").map(|figure| figure.to_string()))
    else {
        let _ = out.execute(Print("PIXHIVE\r\n"));
        return;
    };
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(SUNSET_CORAL, DUSK_VIOLET, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: DUSK_VIOLET.0,
        g: DUSK_VIOLET.1,
        b: DUSK_VIOLET.2,
    }));
    let _ = out.execute(Print(format!(
        "v{version}\r\nCommunity photo gallery\r\n"
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
