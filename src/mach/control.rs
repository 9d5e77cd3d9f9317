use super::{Address, Memory, Operation, Val};
use crate::error;
use crate::lang::{Error, LineNumber, VarHash};
use log::trace;

type Result<T> = std::result::Result<T, Error>;

/// Bytes of memory a `GOSUB` frame accounts for.
pub const GOSUB_LEN: u16 = 5;
/// Bytes of memory a `FOR` frame accounts for.
pub const FOR_LEN: u16 = 20;

/// Where execution continues: a statement address and the line it is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resume {
    pub addr: Address,
    pub line: LineNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub hash: VarHash,
    pub to: Val,
    pub step: Val,
    pub body: Resume,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Gosub(Resume),
    For(ForLoop),
}

impl Frame {
    fn footprint(&self) -> u16 {
        match self {
            Frame::Gosub(_) => GOSUB_LEN,
            Frame::For(_) => FOR_LEN,
        }
    }
}

/// ## Combined FOR and GOSUB stack
///
/// Frames live in a vector but every push and pop is charged against
/// the control region of `Memory` so the stack competes with strings
/// for space exactly as the byte layout does.
#[derive(Debug, Default)]
pub struct ControlStack {
    frames: Vec<Frame>,
}

impl ControlStack {
    pub fn new() -> ControlStack {
        ControlStack::default()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    fn truncate(&mut self, mem: &mut Memory, len: usize) {
        let released: u16 = self.frames[len..].iter().map(Frame::footprint).sum();
        self.frames.truncate(len);
        mem.release_control(released);
    }

    fn push(&mut self, mem: &mut Memory, frame: Frame) -> Result<()> {
        mem.reserve_control(frame.footprint())?;
        self.frames.push(frame);
        Ok(())
    }

    pub fn push_gosub(&mut self, mem: &mut Memory, ret: Resume) -> Result<()> {
        trace!("gosub frame {:04X}", ret.addr);
        self.push(mem, Frame::Gosub(ret))
    }

    /// Push a loop. A loop already running on the same variable is
    /// removed together with everything above it.
    pub fn push_for(&mut self, mem: &mut Memory, frame: ForLoop) -> Result<()> {
        if let Some(index) = self.find_for(Some(frame.hash)) {
            trace!("for frame {} replaced", index);
            self.truncate(mem, index);
        }
        self.push(mem, Frame::For(frame))
    }

    /// Index of the innermost loop on `hash`, or of the innermost loop
    /// when `hash` is `None`. The search stops at a `GOSUB` frame.
    pub fn find_for(&self, hash: Option<VarHash>) -> Option<usize> {
        for (index, frame) in self.frames.iter().enumerate().rev() {
            match frame {
                Frame::Gosub(_) => return None,
                Frame::For(f) => {
                    if hash.is_none() || hash == Some(f.hash) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Pop to the innermost `GOSUB` frame, discarding loops above it.
    pub fn pop_gosub(&mut self, mem: &mut Memory) -> Result<Resume> {
        let found = self.frames.iter().enumerate().rev().find_map(|(i, f)| match f {
            Frame::Gosub(ret) => Some((i, *ret)),
            Frame::For(_) => None,
        });
        match found {
            Some((index, ret)) => {
                self.truncate(mem, index);
                Ok(ret)
            }
            None => Err(error!(ReturnWithoutGosub)),
        }
    }

    /// Step the loop on `hash` (or the innermost loop). Returns where
    /// the body starts when the loop continues; a finished loop is
    /// popped and `None` returned. Loops above the one stepped are
    /// discarded either way.
    pub fn advance_for(&mut self, mem: &mut Memory, hash: Option<VarHash>) -> Result<Option<Resume>> {
        let index = match self.find_for(hash) {
            Some(index) => index,
            None => return Err(error!(NextWithoutFor)),
        };
        self.truncate(mem, index + 1);
        let frame = match &self.frames[index] {
            Frame::For(f) => f.clone(),
            Frame::Gosub(_) => return Err(error!(NextWithoutFor)),
        };
        let addr = match mem.find_var(frame.hash) {
            Some(addr) => addr,
            None => return Err(error!(UndefinedVariable)),
        };
        let var_type = frame.hash.var_type();
        let value = mem.read_val(addr, var_type);
        let value = Operation::convert(Operation::sum(value, frame.step)?, var_type)?;
        mem.write_val(addr, value)?;
        let more = if Operation::is_positive(frame.step) {
            Operation::less_equal(value, frame.to)?
        } else {
            Operation::less_equal(frame.to, value)?
        };
        if more {
            Ok(Some(frame.body))
        } else {
            self.truncate(mem, index);
            Ok(None)
        }
    }
}
