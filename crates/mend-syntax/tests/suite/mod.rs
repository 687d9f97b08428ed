mod declarations;
mod expressions;
mod recovery;
mod statements;
