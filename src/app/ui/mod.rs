mod controls;
mod details;
mod help;
mod panels;
