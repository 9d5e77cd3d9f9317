use super::Address;

/// ## Machine configuration
///
/// ```
/// use basic::mach::{Config, Runtime};
/// let config = Config {
///     ram_top: 0x7FFF,
///     ..Config::default()
/// };
/// let runtime = Runtime::new(config);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Highest address of the memory store.
    pub ram_top: Address,
    /// Simple variable slots added each time the table fills.
    pub var_batch: u16,
    /// Largest upper bound a `DIM` may declare.
    pub max_subscript: i32,
    /// Upper bound given to each subscript of an array used before `DIM`.
    pub default_bound: i32,
    pub calc_capacity: usize,
    pub operator_capacity: usize,
    pub argument_capacity: usize,
    pub parameter_capacity: usize,
    /// Character cells of the default display.
    pub columns: u16,
    pub rows: u16,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            ram_top: 0xFFFF,
            var_batch: 4,
            max_subscript: 16383,
            default_bound: 10,
            calc_capacity: 25,
            operator_capacity: 48,
            argument_capacity: 16,
            parameter_capacity: 16,
            columns: 64,
            rows: 25,
        }
    }
}
