use sdl2::keyboard::Keycode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The keypad layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const KEYMAP: [(Keycode, u8); 16] = [
    (Keycode::X, 0x0),
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Q, 0x4),
    (Keycode::W, 0x5),
    (Keycode::E, 0x6),
    (Keycode::A, 0x7),
    (Keycode::S, 0x8),
    (Keycode::D, 0x9),
    (Keycode::Z, 0xA),
    (Keycode::C, 0xB),
    (Keycode::Num4, 0xC),
    (Keycode::R, 0xD),
    (Keycode::F, 0xE),
    (Keycode::V, 0xF),
];

/// The Chip-8 key a keyboard key stands in for, if any.
pub fn keymap(key: Keycode) -> Option<u8> {
    KEYMAP
        .iter()
        .find(|(code, _)| *code == key)
        .map(|&(_, chip8_key)| chip8_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chip8_key_is_mapped_once() {
        let mut seen = [0; 16];
        for &(_, key) in KEYMAP.iter() {
            seen[key as usize] += 1;
        }
        assert_eq!(seen, [1; 16]);
    }

    #[test]
    fn test_keymap() {
        assert_eq!(keymap(Keycode::Num1), Some(0x1));
        assert_eq!(keymap(Keycode::V), Some(0xF));
        assert_eq!(keymap(Keycode::X), Some(0x0));
        assert_eq!(keymap(Keycode::Space), None);
    }
}
