use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::domain::{Application, ApplicationId};

/// Lookup abstraction so document generation can be exercised without a real store.
pub trait ApplicationRepository: Send + Sync {
    fn find(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("unable to read application data from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("application data is malformed: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
    #[error("application {0} appears more than once")]
    Duplicate(ApplicationId),
}

/// Process-local store backing tests and embedders that build records in code.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<RwLock<HashMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationRepository {
    pub fn new(applications: impl IntoIterator<Item = Application>) -> Self {
        let records = applications
            .into_iter()
            .map(|application| (application.id, application))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Insert or replace an application, returning the previous record.
    pub fn insert(&self, application: Application) -> Result<Option<Application>, RepositoryError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.insert(application.id, application))
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn find(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self
            .records
            .read()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Read-only store hydrated from a JSON array of application records.
#[derive(Debug, Default, Clone)]
pub struct JsonApplicationRepository {
    records: HashMap<ApplicationId, Application>,
}

impl JsonApplicationRepository {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RepositoryError> {
        let applications: Vec<Application> = serde_json::from_reader(reader)
            .map_err(|source| RepositoryError::Malformed { source })?;

        let mut records = HashMap::with_capacity(applications.len());
        for application in applications {
            let id = application.id;
            if records.insert(id, application).is_some() {
                return Err(RepositoryError::Duplicate(id));
            }
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ApplicationRepository for JsonApplicationRepository {
    fn find(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.records.get(id).cloned())
    }
}
