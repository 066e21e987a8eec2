pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
