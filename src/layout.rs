// src/layout.rs - On-screen keyboard bounding boxes for hover selection
use crate::keys::{ActionKey, Key};

// (label, width in key units)
const ROWS: [&[(&str, f64)]; 5] = [
    &[
        ("`", 1.0), ("1", 1.0), ("2", 1.0), ("3", 1.0), ("4", 1.0), ("5", 1.0), ("6", 1.0),
        ("7", 1.0), ("8", 1.0), ("9", 1.0), ("0", 1.0), ("-", 1.0), ("=", 1.0), ("Backspace", 2.0),
    ],
    &[
        ("Tab", 1.5), ("Q", 1.0), ("W", 1.0), ("E", 1.0), ("R", 1.0), ("T", 1.0), ("Y", 1.0),
        ("U", 1.0), ("I", 1.0), ("O", 1.0), ("P", 1.0), ("[", 1.0), ("]", 1.0), ("\\", 1.5),
    ],
    &[
        ("Caps", 1.75), ("A", 1.0), ("S", 1.0), ("D", 1.0), ("F", 1.0), ("G", 1.0), ("H", 1.0),
        ("J", 1.0), ("K", 1.0), ("L", 1.0), (";", 1.0), ("'", 1.0), ("Enter", 2.0),
    ],
    &[
        ("Shift", 2.25), ("Z", 1.0), ("X", 1.0), ("C", 1.0), ("V", 1.0), ("B", 1.0), ("N", 1.0),
        ("M", 1.0), (",", 1.0), (".", 1.0), ("/", 1.0), ("Shift", 2.25),
    ],
    &[
        ("Ctrl", 1.25), ("Win", 1.25), ("Alt", 1.25), ("Space", 6.0), ("Alt", 1.25),
        ("Menu", 1.25), ("Ctrl", 1.25),
    ],
];

const MARGIN: f64 = 10.0;
const GAP: f64 = 6.0;
// Keyboard occupies the frame below this fraction of its height.
const TOP_FRACTION: f64 = 0.55;

fn key_for_label(label: &str) -> Key {
    match label {
        "Backspace" => Key::Backspace,
        "Space" => Key::Space,
        "Tab" => Key::Action(ActionKey::Tab),
        "Caps" => Key::Action(ActionKey::CapsLock),
        "Enter" => Key::Action(ActionKey::Enter),
        "Shift" => Key::Action(ActionKey::Shift),
        "Ctrl" => Key::Action(ActionKey::Ctrl),
        "Alt" => Key::Action(ActionKey::Alt),
        "Win" => Key::Action(ActionKey::Super),
        "Menu" => Key::Action(ActionKey::Menu),
        single => {
            let c = single.chars().next().unwrap_or(' ');
            Key::Char(c.to_ascii_lowercase())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyRect {
    pub label: &'static str,
    pub key: Key,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl KeyRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

/// A key under the pointer. `index` identifies the rectangle, so the two
/// Shift keys are different hover targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub index: usize,
    pub key: Key,
}

#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    keys: Vec<KeyRect>,
}

impl KeyboardLayout {
    /// Standard layout in camera pixels for a `width` x `height` frame.
    pub fn standard(width: f64, height: f64) -> Self {
        let top = height * TOP_FRACTION;
        let bottom = height - MARGIN;
        let available_h = (bottom - top) - GAP * (ROWS.len() as f64 + 1.0);
        let row_h = available_h / ROWS.len() as f64;

        let mut keys = Vec::new();
        let mut y = top + GAP;
        for row in ROWS {
            let units: f64 = row.iter().map(|(_, u)| u).sum();
            let available_w = width - 2.0 * MARGIN - GAP * (row.len() as f64 + 1.0);
            let unit_w = available_w / units;

            let mut x = MARGIN + GAP;
            for &(label, width_units) in row {
                let key_w = width_units * unit_w;
                keys.push(KeyRect {
                    label,
                    key: key_for_label(label),
                    x1: x,
                    y1: y,
                    x2: x + key_w,
                    y2: y + row_h,
                });
                x += key_w + GAP;
            }
            y += row_h + GAP;
        }

        Self { keys }
    }

    pub fn keys(&self) -> &[KeyRect] {
        &self.keys
    }

    /// Key under a pixel position, if any.
    pub fn key_at(&self, x: f64, y: f64) -> Option<Hover> {
        self.keys
            .iter()
            .position(|rect| rect.contains(x, y))
            .map(|index| Hover {
                index,
                key: self.keys[index].key,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(rect: &KeyRect) -> (f64, f64) {
        ((rect.x1 + rect.x2) / 2.0, (rect.y1 + rect.y2) / 2.0)
    }

    #[test]
    fn lays_out_every_key() {
        let layout = KeyboardLayout::standard(1280.0, 720.0);
        let expected: usize = ROWS.iter().map(|row| row.len()).sum();
        assert_eq!(layout.keys().len(), expected);
    }

    #[test]
    fn keys_stay_inside_the_lower_frame() {
        let layout = KeyboardLayout::standard(1280.0, 720.0);
        for rect in layout.keys() {
            assert!(rect.x1 >= 0.0 && rect.x2 <= 1280.0, "{} overflows", rect.label);
            assert!(rect.y1 >= 720.0 * TOP_FRACTION && rect.y2 <= 720.0, "{} overflows", rect.label);
        }
    }

    #[test]
    fn finds_key_under_pointer() {
        let layout = KeyboardLayout::standard(1280.0, 720.0);
        let q = layout.keys().iter().find(|r| r.label == "Q").unwrap();
        let (x, y) = center(q);
        assert_eq!(layout.key_at(x, y).map(|h| h.key), Some(Key::Char('q')));

        let space = layout.keys().iter().find(|r| r.label == "Space").unwrap();
        let (x, y) = center(space);
        assert_eq!(layout.key_at(x, y).map(|h| h.key), Some(Key::Space));
    }

    #[test]
    fn upper_frame_and_gaps_hover_nothing() {
        let layout = KeyboardLayout::standard(1280.0, 720.0);
        assert_eq!(layout.key_at(640.0, 100.0), None);
        let first = &layout.keys()[0];
        assert_eq!(layout.key_at(first.x2 + GAP / 2.0, first.y1 + 1.0), None);
    }

    #[test]
    fn twin_keys_are_distinct_targets() {
        let layout = KeyboardLayout::standard(1280.0, 720.0);
        let shifts: Vec<Hover> = layout
            .keys()
            .iter()
            .filter(|r| r.label == "Shift")
            .map(|r| {
                let (x, y) = center(r);
                layout.key_at(x, y).unwrap()
            })
            .collect();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].key, shifts[1].key);
        assert_ne!(shifts[0].index, shifts[1].index);
    }
}
