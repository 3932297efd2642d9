//! Single-stage GLSL shaders.
//!
//! Compilation runs the naga GLSL front end followed by naga validation on the
//! CPU, so success or failure is known before anything reaches the device. A
//! failed compile never aborts: the diagnostic is logged and kept on the
//! [`Shader`] for callers to inspect.

use std::fmt;
use std::path::{Path, PathBuf};

use wgpu::naga;

/// Pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader compile and attach failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// Source file could not be read.
    Io { path: PathBuf, message: String },
    /// GLSL front end rejected the source.
    Parse { stage: ShaderStage, log: String },
    /// Source parsed but the resulting module is invalid.
    Validation { stage: ShaderStage, log: String },
    /// Attempted to attach a shader whose compilation failed.
    NotCompiled { stage: ShaderStage },
    /// A program already has a shader for this stage.
    StageAlreadyAttached { stage: ShaderStage },
}

impl ShaderError {
    /// Compiler diagnostic text (or the I/O message).
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Io { message, .. } => message,
            ShaderError::Parse { log, .. } | ShaderError::Validation { log, .. } => log,
            ShaderError::NotCompiled { .. } | ShaderError::StageAlreadyAttached { .. } => "",
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, message } => {
                write!(f, "failed to read shader {}: {message}", path.display())
            }
            ShaderError::Parse { stage, log } => {
                write!(f, "{stage} shader failed to compile:\n{log}")
            }
            ShaderError::Validation { stage, log } => {
                write!(f, "{stage} shader failed validation:\n{log}")
            }
            ShaderError::NotCompiled { stage } => {
                write!(f, "cannot attach {stage} shader: it did not compile")
            }
            ShaderError::StageAlreadyAttached { stage } => {
                write!(f, "program already has a {stage} shader")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// A validated module together with its validation results, which record
/// which globals each entry point actually touches.
#[derive(Debug)]
pub(crate) struct Compiled {
    pub(crate) module: naga::Module,
    pub(crate) info: naga::valid::ModuleInfo,
}

/// One compiled (or failed) shader stage.
#[derive(Debug)]
pub struct Shader {
    stage: ShaderStage,
    label: String,
    compiled: Result<Compiled, ShaderError>,
}

impl Shader {
    /// Compiles GLSL source text.
    pub fn from_source(source: &str, stage: ShaderStage) -> Self {
        Self::build(format!("inline {stage} shader"), source, stage)
    }

    /// Reads a file as text and compiles it like [`Shader::from_source`].
    pub fn from_file(path: impl AsRef<Path>, stage: ShaderStage) -> Self {
        let path = path.as_ref();
        let label = path.display().to_string();

        match std::fs::read_to_string(path) {
            Ok(source) => Self::build(label, &source, stage),
            Err(e) => {
                let err = ShaderError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                log::error!("{err}");
                Self {
                    stage,
                    label,
                    compiled: Err(err),
                }
            }
        }
    }

    fn build(label: String, source: &str, stage: ShaderStage) -> Self {
        let compiled = compile_glsl(source, stage);

        match &compiled {
            Ok(_) => log::debug!("compiled {label}"),
            Err(err) => log::error!("{label}: {err}"),
        }

        Self {
            stage,
            label,
            compiled,
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_ok()
    }

    /// The compile failure, if any.
    pub fn error(&self) -> Option<&ShaderError> {
        self.compiled.as_ref().err()
    }

    /// Compiler diagnostics; empty when compilation succeeded.
    pub fn info_log(&self) -> &str {
        self.error().map_or("", ShaderError::log)
    }

    /// The validated module, or `NotCompiled` if compilation failed.
    pub fn module(&self) -> Result<&naga::Module, ShaderError> {
        self.compiled().map(|c| &c.module)
    }

    pub(crate) fn compiled(&self) -> Result<&Compiled, ShaderError> {
        self.compiled
            .as_ref()
            .map_err(|_| ShaderError::NotCompiled { stage: self.stage })
    }
}

fn compile_glsl(source: &str, stage: ShaderStage) -> Result<Compiled, ShaderError> {
    let options = naga::front::glsl::Options::from(stage.to_naga());

    let module = naga::front::glsl::Frontend::default()
        .parse(&options, source)
        .map_err(|e| ShaderError::Parse {
            stage,
            log: non_empty(e.to_string(), "unknown parse error"),
        })?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        stage,
        log: non_empty(e.to_string(), "unknown validation error"),
    })?;

    Ok(Compiled { module, info })
}

fn non_empty(log: String, fallback: &str) -> String {
    if log.trim().is_empty() {
        fallback.to_string()
    } else {
        log
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const VERTEX_SRC: &str = "#version 450
layout(location = 0) in vec2 in_position;
layout(set = 0, binding = 0) uniform WorldBlock {
    mat3 worldMatrix;
};
void main() {
    vec3 transformed = worldMatrix * vec3(in_position, 1.0);
    gl_Position = vec4(transformed, 1.0);
}
";

    pub(crate) const FRAGMENT_SRC: &str = "#version 450
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(1.0, 0.5, 0.0, 1.0);
}
";

    #[test]
    fn valid_vertex_source_compiles() {
        let s = Shader::from_source(VERTEX_SRC, ShaderStage::Vertex);
        assert!(s.is_compiled(), "{}", s.info_log());
        assert!(s.info_log().is_empty());
        assert_eq!(s.stage(), ShaderStage::Vertex);
        assert_eq!(s.module().unwrap().entry_points.len(), 1);
    }

    #[test]
    fn valid_fragment_source_compiles() {
        let s = Shader::from_source(FRAGMENT_SRC, ShaderStage::Fragment);
        assert!(s.is_compiled(), "{}", s.info_log());
    }

    #[test]
    fn syntax_error_reports_non_empty_log() {
        let s = Shader::from_source(
            "#version 450\nvoid main() { this is not glsl }",
            ShaderStage::Vertex,
        );
        assert!(!s.is_compiled());
        assert!(!s.info_log().trim().is_empty());
        assert!(matches!(s.error(), Some(ShaderError::Parse { stage: ShaderStage::Vertex, .. })));
    }

    #[test]
    fn empty_source_fails_without_panicking() {
        let s = Shader::from_source("", ShaderStage::Fragment);
        assert!(!s.is_compiled());
        assert!(!s.info_log().is_empty());
    }

    #[test]
    fn failed_shader_has_no_module() {
        let s = Shader::from_source("garbage", ShaderStage::Fragment);
        assert_eq!(
            s.module().unwrap_err(),
            ShaderError::NotCompiled { stage: ShaderStage::Fragment }
        );
    }

    #[test]
    fn from_file_reads_and_compiles() {
        let path = std::env::temp_dir().join(format!("spinquad-frag-{}.glsl", std::process::id()));
        std::fs::write(&path, FRAGMENT_SRC).unwrap();

        let s = Shader::from_file(&path, ShaderStage::Fragment);
        std::fs::remove_file(&path).ok();

        assert!(s.is_compiled(), "{}", s.info_log());
        assert_eq!(s.label(), path.display().to_string());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let s = Shader::from_file("definitely/not/here.glsl", ShaderStage::Fragment);
        assert!(!s.is_compiled());
        assert!(matches!(s.error(), Some(ShaderError::Io { .. })));
        assert!(!s.info_log().is_empty());
    }
}
