//! Bundled campus network used when no topology document is supplied.

use crate::identifiers::LineIdentifier;
use crate::models::types::{Line, LinePattern, Stop};

type SeedStop = (&'static str, &'static str, f64, f64);

fn line(id: &str, name: &str, color: &str, pattern: LinePattern, stops: &[SeedStop]) -> Line {
    Line {
        id: LineIdentifier::new(id),
        name: name.into(),
        color: color.into(),
        pattern,
        stops: stops
            .iter()
            .enumerate()
            .map(|(index, &(id, name, latitude, longitude))| {
                Stop::new(id, name, latitude, longitude, index as u32 + 1)
            })
            .collect(),
    }
}

pub fn seed_lines() -> Vec<Line> {
    vec![
        line(
            "a-line",
            "A Line",
            "#0066CC",
            LinePattern::Solid,
            &[
                ("a1", "Memorial Union", 38.5415, -121.7489),
                ("a2", "Silo", 38.5423, -121.7501),
                ("a3", "Shields Library", 38.5407, -121.7512),
                ("a4", "ARC", 38.5389, -121.7543),
                ("a5", "Tercero", 38.5378, -121.7621),
            ],
        ),
        line(
            "c-line",
            "C Line",
            "#CC3333",
            LinePattern::Dots,
            &[
                ("c1", "Downtown Terminal", 38.5449, -121.7405),
                ("c2", "5th & G Street", 38.5442, -121.7421),
                ("c3", "Memorial Union", 38.5415, -121.7489),
                ("c4", "Cuarto", 38.5356, -121.7634),
            ],
        ),
        line(
            "g-line",
            "G Line",
            "#33AA33",
            LinePattern::Stripes,
            &[
                ("g1", "Silo", 38.5423, -121.7501),
                ("g2", "Tercero", 38.5378, -121.7621),
                ("g3", "Cuarto", 38.5356, -121.7634),
                ("g4", "Orchard Park", 38.5334, -121.7589),
            ],
        ),
        line(
            "m-line",
            "M Line",
            "#CC6600",
            LinePattern::Dots,
            &[
                ("m1", "Memorial Union", 38.5415, -121.7489),
                ("m2", "Segundo", 38.5401, -121.7578),
                ("m3", "Tercero", 38.5378, -121.7621),
                ("m4", "Cuarto", 38.5356, -121.7634),
                ("m5", "Downtown Terminal", 38.5449, -121.7405),
            ],
        ),
        line(
            "p-line",
            "P Line",
            "#9933CC",
            LinePattern::Grid,
            &[
                ("p1", "Memorial Union", 38.5415, -121.7489),
                ("p2", "West Village", 38.5445, -121.7623),
                ("p3", "Solano Park", 38.5512, -121.7701),
            ],
        ),
        line(
            "q-line",
            "Q Line",
            "#FF9933",
            LinePattern::Waves,
            &[
                ("q1", "Downtown Terminal", 38.5449, -121.7405),
                ("q2", "Silo", 38.5423, -121.7501),
                ("q3", "ARC", 38.5389, -121.7543),
                ("q4", "Segundo", 38.5401, -121.7578),
            ],
        ),
        line(
            "w-line",
            "W Line",
            "#0099CC",
            LinePattern::Grid,
            &[
                ("w1", "West Village", 38.5445, -121.7623),
                ("w2", "Silo", 38.5423, -121.7501),
                ("w3", "Shields Library", 38.5407, -121.7512),
                ("w4", "ARC", 38.5389, -121.7543),
                ("w5", "Segundo", 38.5401, -121.7578),
            ],
        ),
    ]
}
