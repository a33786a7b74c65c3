mod intercept_query;
mod terminal;

pub use intercept_query::InterceptQueryUseCase;
pub use terminal::TerminalHandler;
