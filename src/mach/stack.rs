use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector
///
/// The evaluator's four stacks. Pushing past the capacity is an
/// `EXPRESSION STACK OVERFLOW`, popping an empty stack an
/// `EXPRESSION STACK UNDERFLOW`.
pub struct Stack<T> {
    capacity: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(capacity: usize) -> Stack<T> {
        Stack {
            capacity,
            vec: Vec::with_capacity(capacity),
        }
    }
    fn underflow_error(&self) -> Error {
        error!(StackUnderflow)
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    /// Item `depth` places below the top; zero is the top.
    pub fn peek(&self, depth: usize) -> Result<&T> {
        if depth < self.vec.len() {
            Ok(&self.vec[self.vec.len() - 1 - depth])
        } else {
            Err(self.underflow_error())
        }
    }
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.vec.iter_mut()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() >= self.capacity {
            return Err(error!(StackOverflow));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(self.underflow_error()),
        }
    }
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
    pub fn pop_n(&mut self, len: usize) -> Result<Vec<T>> {
        if len > self.vec.len() {
            Err(self.underflow_error())
        } else {
            let range = (self.vec.len() - len)..;
            Ok(self.vec.drain(range).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_capacity_and_underflow() {
        let mut stack = Stack::new(2);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert!(stack.push(3).unwrap_err().is(ErrorCode::StackOverflow));
        assert_eq!(*stack.peek(1).unwrap(), 1);
        assert_eq!(stack.pop_2().unwrap(), (1, 2));
        assert!(stack.pop().unwrap_err().is(ErrorCode::StackUnderflow));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_n_keeps_order() {
        let mut stack = Stack::new(4);
        for n in 1..=4 {
            stack.push(n).unwrap();
        }
        assert_eq!(stack.pop_n(3).unwrap(), vec![2, 3, 4]);
        assert_eq!(stack.len(), 1);
        assert!(stack.pop_n(2).is_err());
    }
}
