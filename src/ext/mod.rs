mod workspace_path_ext;

pub use workspace_path_ext::WorkspacePathExt;
