mod lowering;
mod members;
