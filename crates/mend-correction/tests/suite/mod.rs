mod end_to_end;
mod ranking;
mod requests;
