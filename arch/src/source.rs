use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Files under `path` with extension `ext`: the file itself, or every match below a
/// directory in sorted path order.
pub fn collect(path: &Path, ext: &str) -> io::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    walk(path, ext, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, ext: &str, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, ext, files)?;
        } else if path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    Ok(())
}

/// File name without extension, used as the unit name of a source.
pub fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/X.in` -> `dir/X.<ext>`, `dir/` -> `dir/dir.<ext>`.
pub fn output_path(input: &Path, ext: &str) -> PathBuf {
    if input.is_dir() {
        input.join(stem(input)).with_extension(ext)
    } else {
        input.with_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_sorted_and_filtered() {
        let dir = std::env::temp_dir().join(format!("arch-source-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("b.vm"), "").unwrap();
        fs::write(dir.join("a.vm"), "").unwrap();
        fs::write(dir.join("c.asm"), "").unwrap();
        fs::write(dir.join("sub").join("d.vm"), "").unwrap();

        let files = collect(&dir, "vm").unwrap();
        let names: Vec<String> = files.iter().map(|p| stem(p)).collect();
        assert_eq!(names, vec!["a", "b", "d"]);
        assert_eq!(output_path(&dir, "asm"), dir.join(format!("{}.asm", stem(&dir))));
        assert_eq!(output_path(&dir.join("a.vm"), "asm"), dir.join("a.asm"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
