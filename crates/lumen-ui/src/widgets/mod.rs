pub mod align;
pub mod column;
pub mod gradient_text;
pub mod text;
