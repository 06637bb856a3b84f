// Output layer: renders report data into the bytes written by the load stage.

pub mod answers;
pub mod report_tex;
pub mod stats;
