pub mod line_pass;
pub mod mesh_pass;
pub mod render_pass_context;
