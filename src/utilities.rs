use std::{fs::DirBuilder, io, path::Path};

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o755;

/// Creates a directory and all of its missing parents.
///
/// On Unix the created directories are readable by everyone and writable only by the owner.
pub fn create_directory<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let mut builder = DirBuilder::new();

    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;

        builder.mode(DIRECTORY_MODE);
    }

    builder.create(path)
}
