use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use mk_model::MakeParams;

/// Fully resolved invocation: `<program> [-f <file>] <target>` run in `workdir`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub file: Option<PathBuf>,
    pub target: String,
    pub workdir: PathBuf,
}

impl CommandLine {
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(3);
        if let Some(file) = &self.file {
            args.push(OsString::from("-f"));
            args.push(file.as_os_str().to_owned());
        }
        args.push(OsString::from(&self.target));
        args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        if let Some(file) = &self.file {
            write!(f, " -f {}", file.display())?;
        }
        write!(f, " {}", self.target)
    }
}

/// Resolve params against the executor defaults.
///
/// Pure: the filesystem is never consulted, so missing paths only surface at launch.
pub fn resolve(program: &Path, default_workdir: &Path, params: &MakeParams) -> CommandLine {
    let workdir = params.workdir().unwrap_or(default_workdir).to_path_buf();
    let file = params.file().map(|file| {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            workdir.join(file)
        }
    });

    CommandLine {
        program: program.to_path_buf(),
        file,
        target: params.target().to_string(),
        workdir,
    }
}
