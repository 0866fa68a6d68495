pub mod dispatcher;
pub mod formatter;

pub use dispatcher::Dispatcher;
pub use formatter::MessageFormatter;
