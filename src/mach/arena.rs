use super::{Address, Config, MemoryStore, StreamCache};
use crate::error;
use crate::lang::{Error, VarType};
use log::trace;

type Result<T> = std::result::Result<T, Error>;

/// Bytes reserved at address zero. Address zero doubles as the null
/// string pointer so nothing may live there.
pub const HEADER: Address = 0x10;

/// Size of the command line buffer at the top of the store.
pub const CMD_LINE_LEN: Address = 256;

/// Number of durable string size classes.
pub const SIZE_CLASSES: usize = 16;

/// Regions that grow by shifting everything above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Program,
    Variables,
    Arrays,
    Control,
}

/// ## Region boundaries
///
/// ```text
/// 0x0000      header
/// prog_start  program lines        (grows up)
/// var_start   simple variables     (grows up)
/// dim_start   arrays               (grows up)
/// gosub_bot   control stack        (grows up)
/// gosub_top   temporary strings    (bump allocated, reset per statement)
/// temp_top    free
/// string_bot  durable strings      (grows down)
/// cmd_line    command line buffer
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub prog_start: Address,
    pub var_start: Address,
    pub dim_start: Address,
    pub gosub_bot: Address,
    pub gosub_top: Address,
    pub temp_top: Address,
    pub string_bot: Address,
    pub cmd_line: Address,
}

impl Layout {
    fn new(top: Address) -> Layout {
        let cmd_line = top.saturating_sub(CMD_LINE_LEN - 1);
        Layout {
            prog_start: HEADER,
            var_start: HEADER,
            dim_start: HEADER,
            gosub_bot: HEADER,
            gosub_top: HEADER,
            temp_top: HEADER,
            string_bot: cmd_line,
            cmd_line,
        }
    }

    /// Boundaries that move when `region` changes size.
    fn above(&mut self, region: Region) -> Vec<&mut Address> {
        let mut all = vec![
            &mut self.var_start,
            &mut self.dim_start,
            &mut self.gosub_bot,
            &mut self.gosub_top,
            &mut self.temp_top,
        ];
        let skip = match region {
            Region::Program => 0,
            Region::Variables => 1,
            Region::Arrays => 2,
            Region::Control => 3,
        };
        all.drain(..skip);
        all
    }
}

/// ## The machine's memory
///
/// Owns the stream cache and every region boundary. All of the
/// program store, symbol tables and string heap operate through this
/// value; see `program.rs`, `var.rs` and `heap.rs`.
#[derive(Debug)]
pub struct Memory {
    pub stream: StreamCache,
    layout: Layout,
    pub(super) free_lists: [Address; SIZE_CLASSES],
    pub(super) def_types: [VarType; 26],
    pub(super) var_batch: u16,
    pub(super) max_subscript: i32,
}

impl Memory {
    pub fn new(store: Box<dyn MemoryStore>, config: &Config) -> Memory {
        let stream = StreamCache::new(store);
        let layout = Layout::new(stream.top());
        Memory {
            stream,
            layout,
            free_lists: [0; SIZE_CLASSES],
            def_types: [VarType::Float; 26],
            var_batch: config.var_batch.max(1),
            max_subscript: config.max_subscript,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(super) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Gap between the temporary strings and the durable heap.
    pub fn bytes_free(&self) -> u16 {
        self.layout.string_bot.saturating_sub(self.layout.temp_top)
    }

    /// Forget every variable, array, control frame and string.
    pub fn clear_variables(&mut self) {
        let l = &mut self.layout;
        l.dim_start = l.var_start;
        l.gosub_bot = l.var_start;
        l.gosub_top = l.var_start;
        l.temp_top = l.var_start;
        l.string_bot = l.cmd_line;
        self.free_lists = [0; SIZE_CLASSES];
        self.def_types = [VarType::Float; 26];
        trace!("variables cleared, {} bytes free", self.bytes_free());
    }

    /// Forget the program as well.
    pub fn clear_everything(&mut self) {
        self.layout.var_start = self.layout.prog_start;
        self.clear_variables();
    }

    /// Open `len` zeroed bytes at `at` inside `region`. Everything from
    /// `at` up to the end of the temporary strings moves up.
    pub fn grow(&mut self, region: Region, at: Address, len: u16) -> Result<()> {
        if len > self.bytes_free() {
            return Err(error!(InsufficientMemory));
        }
        let top = self.layout.temp_top;
        trace!("grow {:?} by {} at {:04X}", region, len, at);
        self.stream.mem_move(at + len, at, (top - at) as usize);
        self.stream.clear(at, len as usize);
        for boundary in self.layout.above(region) {
            *boundary += len;
        }
        Ok(())
    }

    /// Close `len` bytes at `at` inside `region`.
    pub fn shrink(&mut self, region: Region, at: Address, len: u16) {
        let top = self.layout.temp_top;
        let src = at + len;
        trace!("shrink {:?} by {} at {:04X}", region, len, at);
        self.stream.mem_move(at, src, top.saturating_sub(src) as usize);
        for boundary in self.layout.above(region) {
            *boundary -= len;
        }
    }

    /// Account for a control frame of `len` bytes. Any temporary
    /// strings are abandoned.
    pub fn reserve_control(&mut self, len: u16) -> Result<()> {
        let l = &mut self.layout;
        if l.gosub_top as u32 + len as u32 >= l.string_bot as u32 {
            return Err(error!(InsufficientMemory));
        }
        l.gosub_top += len;
        l.temp_top = l.gosub_top;
        Ok(())
    }

    pub fn release_control(&mut self, len: u16) {
        let l = &mut self.layout;
        l.gosub_top = l.gosub_top.saturating_sub(len).max(l.gosub_bot);
        if l.temp_top < l.gosub_top {
            l.temp_top = l.gosub_top;
        }
    }

    /// Default type of untyped names starting with `letter` (0 is A).
    pub fn def_type(&self, letter: usize) -> VarType {
        self.def_types.get(letter).copied().unwrap_or(VarType::Float)
    }

    pub fn set_def_type(&mut self, letter: usize, var_type: VarType) {
        if let Some(slot) = self.def_types.get_mut(letter) {
            *slot = var_type;
        }
    }
}
