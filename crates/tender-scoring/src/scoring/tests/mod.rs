mod common;
mod confidence;
mod weights;
