//! University catalog loading: YAML files under a directory, or the
//! built-in starter list.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use crate::onboarding::Destination;
use crate::workspace::UniversitySettings;

use super::University;

#[derive(Debug, Clone, Default)]
pub struct UniversityCatalog {
    universities: Vec<University>,
}

impl UniversityCatalog {
    pub fn new(universities: Vec<University>) -> Result<Self> {
        let mut seen = HashSet::new();
        for university in &universities {
            if !seen.insert(university.id.clone()) {
                bail!("Duplicate university id '{}' in catalog", university.id);
            }
        }
        Ok(Self { universities })
    }

    pub fn from_settings(settings: &UniversitySettings) -> Result<Self> {
        match &settings.catalog_dir {
            Some(dir) => Self::load_dir(dir),
            None => Ok(Self::builtin()),
        }
    }

    /// Reads every `.yaml`/`.yml` file below `dir`; each holds a list of
    /// universities. Files are visited in path order.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            bail!("University catalog directory {:?} does not exist", dir);
        }
        let mut universities = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if !is_yaml(path) {
                continue;
            }
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file {:?}", path))?;
            let mut batch: Vec<University> = serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse catalog file {:?}", path))?;
            universities.append(&mut batch);
        }
        Self::new(universities)
    }

    pub fn builtin() -> Self {
        use Destination::{Uk, Usa};
        let universities = vec![
            starter("mit", "Massachusetts Institute of Technology", Usa, "Cambridge")
                .offering(&["computer-science", "engineering", "business"])
                .priced(61_000, Some(1)),
            starter("stanford", "Stanford University", Usa, "Stanford")
                .offering(&["computer-science", "engineering", "medicine"])
                .priced(62_000, Some(3)),
            starter("asu", "Arizona State University", Usa, "Tempe")
                .offering(&["engineering", "business", "data-science"])
                .priced(33_000, Some(179)),
            starter("uiuc", "University of Illinois Urbana-Champaign", Usa, "Champaign")
                .offering(&["computer-science", "engineering", "data-science"])
                .priced(38_000, Some(64)),
            starter("oxford", "University of Oxford", Uk, "Oxford")
                .offering(&["law", "medicine", "business"])
                .priced(48_000, Some(2)),
            starter("imperial", "Imperial College London", Uk, "London")
                .offering(&["engineering", "medicine", "data-science"])
                .priced(45_000, Some(6)),
            starter("manchester", "University of Manchester", Uk, "Manchester")
                .offering(&["business", "computer-science", "engineering"])
                .priced(31_000, Some(34)),
            starter("coventry", "Coventry University", Uk, "Coventry")
                .offering(&["business", "engineering"])
                .priced(19_000, None),
        ];
        Self { universities }
    }

    pub fn all(&self) -> &[University] {
        &self.universities
    }

    pub fn len(&self) -> usize {
        self.universities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.universities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&University> {
        self.universities.iter().find(|u| u.id == id)
    }
}

fn starter(id: &str, name: &str, country: Destination, city: &str) -> University {
    University {
        id: id.to_string(),
        name: name.to_string(),
        country,
        city: city.to_string(),
        programs: Vec::new(),
        annual_tuition_usd: 0,
        ranking: None,
    }
}

impl University {
    fn offering(mut self, programs: &[&str]) -> Self {
        self.programs = programs.iter().map(|p| p.to_string()).collect();
        self
    }

    fn priced(mut self, annual_tuition_usd: u32, ranking: Option<u32>) -> Self {
        self.annual_tuition_usd = annual_tuition_usd;
        self.ranking = ranking;
        self
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_nested_yaml_files() {
        let tmp = TempDir::new().unwrap();
        let uk = tmp.path().join("uk");
        fs::create_dir_all(&uk).unwrap();
        fs::write(
            tmp.path().join("usa.yaml"),
            concat!(
                "- id: nyu\n",
                "  name: New York University\n",
                "  country: usa\n",
                "  city: New York\n",
                "  programs: [business]\n",
                "  annual_tuition_usd: 58000\n",
                "  ranking: 38\n",
            ),
        )
        .unwrap();
        fs::write(
            uk.join("scotland.yml"),
            concat!(
                "- id: edinburgh\n",
                "  name: University of Edinburgh\n",
                "  country: uk\n",
                "  city: Edinburgh\n",
                "  annual_tuition_usd: 36000\n",
            ),
        )
        .unwrap();
        fs::write(tmp.path().join("README.txt"), "not a catalog").unwrap();

        let catalog = UniversityCatalog::load_dir(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let edinburgh = catalog.get("edinburgh").unwrap();
        assert!(edinburgh.programs.is_empty());
        assert_eq!(edinburgh.ranking, None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let entry = concat!(
            "- id: mit\n",
            "  name: MIT\n",
            "  country: usa\n",
            "  city: Cambridge\n",
            "  annual_tuition_usd: 61000\n",
        );
        fs::write(tmp.path().join("a.yaml"), entry).unwrap();
        fs::write(tmp.path().join("b.yaml"), entry).unwrap();
        let err = UniversityCatalog::load_dir(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("mit"));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = UniversityCatalog::builtin();
        assert!(UniversityCatalog::new(builtin.all().to_vec()).is_ok());
        assert!(builtin.get("oxford").is_some());
    }
}
