pub mod simple_formatter;

pub use simple_formatter::SimpleFormatter;
