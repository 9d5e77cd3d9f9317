use std::collections::VecDeque;

/// Cells at or above this value hold 2x3 block graphics.
pub const GRAPHICS: u8 = 0x80;

/// ## Character cell display
///
/// The runtime prints through `put_char` and positions the cursor for
/// `PRINT @`, `AT` and `TAB`. Everything printed is also kept as plain
/// text for the host to collect with `take_output`.
pub trait Display {
    /// Columns and rows.
    fn size(&self) -> (u16, u16);
    /// Print at the cursor. Handles `\n`, `\r`, `\t` and backspace.
    fn put_char(&mut self, ch: u8);
    fn cell(&self, x: u16, y: u16) -> u8;
    fn set_cell(&mut self, x: u16, y: u16, ch: u8);
    fn cursor(&self) -> (u16, u16);
    fn set_cursor(&mut self, x: u16, y: u16);
    fn clear(&mut self);
    fn take_output(&mut self) -> String;
}

/// ## Keyboard
///
/// Polled, never called back. Keys above 0xFF are extended keys.
pub trait Keyboard {
    fn read_key(&mut self) -> Option<u16>;
    /// Modifier key state for `EXTKEY`.
    fn flags(&self) -> u8;
    /// True once per break key press.
    fn take_break(&mut self) -> bool;
}

/// In-memory display with a text transcript.
#[derive(Debug)]
pub struct Screen {
    columns: u16,
    rows: u16,
    cells: Vec<u8>,
    x: u16,
    y: u16,
    output: String,
}

impl Screen {
    pub fn new(columns: u16, rows: u16) -> Screen {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Screen {
            columns,
            rows,
            cells: vec![b' '; columns as usize * rows as usize],
            x: 0,
            y: 0,
            output: String::new(),
        }
    }

    fn scroll(&mut self) {
        let width = self.columns as usize;
        self.cells.drain(..width);
        self.cells.extend(std::iter::repeat(b' ').take(width));
    }

    fn newline(&mut self) {
        self.x = 0;
        self.y += 1;
        if self.y >= self.rows {
            self.y = self.rows - 1;
            self.scroll();
        }
    }

    fn put_raw(&mut self, ch: u8) {
        if self.x >= self.columns || self.y >= self.rows {
            self.x = 0;
            self.y = 0;
        }
        let index = self.y as usize * self.columns as usize + self.x as usize;
        self.cells[index] = ch;
        self.output.push(if ch >= GRAPHICS { '#' } else { ch as char });
        self.x += 1;
        if self.x >= self.columns {
            self.newline();
        }
    }
}

impl Display for Screen {
    fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    fn put_char(&mut self, ch: u8) {
        match ch {
            b'\n' => {
                self.output.push('\n');
                self.newline();
            }
            b'\r' => self.x = 0,
            8 => self.x = self.x.saturating_sub(1),
            b'\t' => {
                for _ in 0..(4 - (self.x & 3)) {
                    self.put_raw(b' ');
                }
            }
            0 => {}
            _ => self.put_raw(ch),
        }
    }

    fn cell(&self, x: u16, y: u16) -> u8 {
        if x >= self.columns || y >= self.rows {
            return 0;
        }
        self.cells[y as usize * self.columns as usize + x as usize]
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: u8) {
        if x < self.columns && y < self.rows {
            self.cells[y as usize * self.columns as usize + x as usize] = ch;
        }
    }

    fn cursor(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.x = x.min(self.columns - 1);
        self.y = y.min(self.rows - 1);
    }

    fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = b' ';
        }
        self.x = 0;
        self.y = 0;
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// A keyboard fed by the host.
#[derive(Debug, Default)]
pub struct KeyQueue {
    keys: VecDeque<u16>,
    flags: u8,
    break_pressed: bool,
}

impl KeyQueue {
    pub fn push_key(&mut self, key: u16) {
        self.keys.push_back(key);
    }

    pub fn set_flags(&mut self, flags: u8) {
        self.flags = flags;
    }

    pub fn press_break(&mut self) {
        self.break_pressed = true;
    }
}

impl Keyboard for KeyQueue {
    fn read_key(&mut self) -> Option<u16> {
        self.keys.pop_front()
    }

    fn flags(&self) -> u8 {
        self.flags
    }

    fn take_break(&mut self) -> bool {
        std::mem::replace(&mut self.break_pressed, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_pads_to_multiple_of_four() {
        let mut s = Screen::new(64, 25);
        s.put_char(b'A');
        s.put_char(b'\t');
        s.put_char(b'B');
        assert_eq!(s.take_output(), "A   B");
        assert_eq!(s.cursor(), (5, 0));
    }

    #[test]
    fn test_scroll_keeps_cursor_on_last_row() {
        let mut s = Screen::new(4, 2);
        s.put_char(b'X');
        s.put_char(b'\n');
        s.put_char(b'Y');
        s.put_char(b'\n');
        assert_eq!(s.cursor(), (0, 1));
        assert_eq!(s.cell(0, 0), b'Y');
    }
}
