use crate::session::mutation::{MutationKind, OperationLog};
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

/// 把卸载 / 更新日志落盘，只写不读
#[derive(Debug, Clone)]
pub struct LogSaver {
    base_dir: PathBuf,
}

impl LogSaver {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn save(&self, kind: MutationKind, log: &OperationLog) -> Result<PathBuf> {
        let at = log.finished_at;

        // 目录结构: YYYY/MM/DD/
        let dir = self
            .base_dir
            .join(at.format("%Y").to_string())
            .join(at.format("%m").to_string())
            .join(at.format("%d").to_string());
        fs::create_dir_all(&dir)?;

        // 文件名: HH-MM-SS-<op>-<name>.log，包名中的 / 替换掉（tap 形式 user/tap/pkg）
        let safe_name = log.target.replace('/', "_");
        let filename = format!("{}-{}-{}.log", at.format("%H-%M-%S"), kind.slug(), safe_name);
        let filepath = dir.join(filename);

        let mut content = format!(
            "{} {}\n时间: {}\n\n",
            kind.label(),
            log.target,
            at.format("%Y-%m-%d %H:%M:%S")
        );
        content.push_str(&log.text);
        content.push('\n');

        fs::write(&filepath, content)?;
        log::info!("日志已保存: {}", filepath.display());

        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_under_dated_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let saver = LogSaver::new(tmp.path().to_path_buf());
        let log = OperationLog::new("homebrew/core/wget", "Uninstalling wget... (9 files)");

        let path = saver.save(MutationKind::Remove, &log).unwrap();

        let expected_dir = tmp
            .path()
            .join(log.finished_at.format("%Y/%m/%d").to_string());
        assert_eq!(path.parent().unwrap(), expected_dir);
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.ends_with("-uninstall-homebrew_core_wget.log"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("卸载 homebrew/core/wget\n"));
        assert!(content.contains("Uninstalling wget... (9 files)"));
    }
}
