mod common;
mod reasoning;
