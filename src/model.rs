use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Default data folder, created next to the working directory's parent so the
/// data survives re-checkouts of the exercise repository.
pub const DEFAULT_DATA_DIR: &str = "DataSAI_data_folder";

/// A downloadable course dataset: symbolic id, share link and the file name
/// it is stored under locally.
#[derive(Copy, Clone, Debug)]
pub struct DatasetReference {
    pub id: &'static str,
    pub url: &'static str,
    pub file_name: &'static str,
}

impl DatasetReference {
    pub const MINISCOPE: DatasetReference = DatasetReference {
        id: "miniscope",
        url: "https://drive.google.com/file/d/1cLbUqh2LKLXuwqXdjyvMi4DuKMFC0DiM/view?usp=drive_link",
        file_name: "miniscope_data.npy",
    };
    pub const WIDEFIELD: DatasetReference = DatasetReference {
        id: "widefield",
        url: "https://drive.google.com/file/d/1XNCPKY5bRS9QtvY1aj982CjaCkMgeOJt/view?usp=drive_link",
        file_name: "widefield_data.mat",
    };

    /// Look up a dataset by its symbolic id. Unknown ids are rejected
    /// explicitly instead of falling through to a broken download.
    pub fn resolve(id: &str) -> Result<&'static DatasetReference> {
        match DATASETS.iter().find(|d| d.id == id) {
            Some(dataset) => Ok(dataset),
            None => {
                let known = DATASETS.iter().map(|d| d.id).collect::<Vec<_>>().join(", ");
                bail!("unknown dataset kind {id:?}, expected one of: {known}")
            }
        }
    }
}

pub static DATASETS: [DatasetReference; 2] = [DatasetReference::MINISCOPE, DatasetReference::WIDEFIELD];

/// `<parent of cwd>/DataSAI_data_folder`, the destination used when the
/// caller does not pass one.
pub fn default_data_dir() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let parent = cwd.parent().unwrap_or(cwd.as_path());
    Ok(parent.join(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_datasets() {
        assert_eq!(DatasetReference::resolve("miniscope").unwrap().file_name, "miniscope_data.npy");
        assert_eq!(DatasetReference::resolve("widefield").unwrap().file_name, "widefield_data.mat");
    }

    #[test]
    fn rejects_unknown_dataset_kind() {
        let err = DatasetReference::resolve("two-photon").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown dataset kind"), "{msg}");
        assert!(msg.contains("miniscope") && msg.contains("widefield"), "{msg}");
    }

    #[test]
    fn default_dir_is_sibling_of_cwd() {
        let dir = default_data_dir().unwrap();
        assert_eq!(dir.file_name().unwrap(), DEFAULT_DATA_DIR);
    }
}
