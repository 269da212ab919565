//! Fail-fast loading of a model directory
//!
//! Every artifact is read and cross-checked once at startup. Any missing or
//! malformed document, or any dimension disagreement between artifacts, is a
//! [`Error::ModelLoad`] so the server never starts half-configured.

use crate::documents::{
    CorpusDocument, ReducedDocument, CATALOG_FILE, CLASSIFIER_DIR, CORPUS_FILE, REDUCED_FILE,
    SCHEMA_FILE,
};
use metricrec_classify::{Classifier, ClassifierEnsemble, LogisticClassifier};
use metricrec_core::{
    CatalogDocument, DimensionReducer, Error, MetricCatalog, Profile, Result, TextVectorizer,
    Vector, CATEGORIES,
};
use metricrec_schema::{FeatureSchema, ProfileNormalizer};
use metricrec_similarity::{
    Corpus, CorpusProfile, FeatureWeights, ReducedProfile, ReducedSpaceEngine,
    WeightedSimilarityEngine,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Everything the engine needs, loaded and validated
pub struct LoadedModels {
    pub normalizer: ProfileNormalizer,
    pub ensemble: ClassifierEnsemble,
    pub catalog: Arc<MetricCatalog>,
    pub weighted: WeightedSimilarityEngine,
    /// Present only when the directory carries `reduced.json`
    pub reduced: Option<ReducedSpaceEngine>,
}

/// A model directory on disk
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<LoadedModels> {
        info!("Loading models from {:?}", self.dir);

        let normalizer = self.load_schema()?;
        let ensemble = self.load_classifiers(normalizer.schema())?;
        let catalog = Arc::new(self.load_catalog()?);
        let weighted = self.load_corpus(catalog.clone())?;
        let reduced = self.load_reduced(catalog.clone())?;

        info!(
            "Models loaded: {} classifiers, {} catalog metrics, {} corpus profiles, reduced space {}",
            ensemble.len(),
            catalog.len(),
            weighted.corpus().len(),
            if reduced.is_some() { "enabled" } else { "disabled" }
        );

        Ok(LoadedModels {
            normalizer,
            ensemble,
            catalog,
            weighted,
            reduced,
        })
    }

    fn load_schema(&self) -> Result<ProfileNormalizer> {
        let schema: FeatureSchema = self.read_document(SCHEMA_FILE)?;
        ProfileNormalizer::new(schema)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", SCHEMA_FILE, e)))
    }

    fn load_classifiers(&self, schema: &FeatureSchema) -> Result<ClassifierEnsemble> {
        let mut classifiers: HashMap<String, Arc<dyn Classifier>> = HashMap::new();
        for category in CATEGORIES {
            let relative = format!("{}/{}.json", CLASSIFIER_DIR, category.column);
            let model: LogisticClassifier = self.read_document(&relative)?;
            classifiers.insert(category.column.to_string(), Arc::new(model));
        }

        let ensemble = ClassifierEnsemble::new(&CATEGORIES, classifiers)?;
        ensemble.check_input_dim(schema.inference_len())?;
        Ok(ensemble)
    }

    fn load_catalog(&self) -> Result<MetricCatalog> {
        let doc: CatalogDocument = self.read_document(CATALOG_FILE)?;
        Ok(MetricCatalog::from_document(doc))
    }

    fn load_corpus(&self, catalog: Arc<MetricCatalog>) -> Result<WeightedSimilarityEngine> {
        let doc: CorpusDocument = self.read_document(CORPUS_FILE)?;

        let mut vectorizers: HashMap<String, Arc<dyn TextVectorizer>> = HashMap::new();
        for (feature, vectorizer) in doc.vectorizers {
            vectorizer
                .validate()
                .map_err(|e| Error::ModelLoad(format!("vectorizer '{}': {}", feature, e)))?;
            vectorizers.insert(feature, Arc::new(vectorizer));
        }

        let profiles = doc
            .profiles
            .into_iter()
            .map(|p| CorpusProfile::new(p.id, Profile::from_json_map(&p.values), p.matched_metrics))
            .collect();
        let corpus = Corpus::new(doc.features, profiles)?;

        let weights = match doc.weights {
            Some(weights) => weights,
            None => FeatureWeights::profile_defaults(),
        };
        weights
            .validate()
            .map_err(|e| Error::ModelLoad(format!("{}: {}", CORPUS_FILE, e)))?;

        WeightedSimilarityEngine::new(Arc::new(corpus), &vectorizers, weights, catalog)
    }

    fn load_reduced(&self, catalog: Arc<MetricCatalog>) -> Result<Option<ReducedSpaceEngine>> {
        if !self.dir.join(REDUCED_FILE).exists() {
            info!("No {} found, reduced-space recommendations disabled", REDUCED_FILE);
            return Ok(None);
        }

        let doc: ReducedDocument = self.read_document(REDUCED_FILE)?;
        doc.vectorizer
            .validate()
            .map_err(|e| Error::ModelLoad(format!("{}: {}", REDUCED_FILE, e)))?;
        doc.reducer
            .validate()
            .map_err(|e| Error::ModelLoad(format!("{}: {}", REDUCED_FILE, e)))?;

        let vectorizer: Arc<dyn TextVectorizer> = Arc::new(doc.vectorizer);
        let reducer: Arc<dyn DimensionReducer> = Arc::new(doc.reducer);
        let profiles = doc
            .profiles
            .into_iter()
            .map(|p| ReducedProfile {
                id: p.id,
                embedding: Vector::new(p.embedding),
                metric: p.metric,
            })
            .collect();

        let engine = ReducedSpaceEngine::new(vectorizer, reducer, profiles, catalog)?
            .with_fields(doc.fields)
            .with_min_similarity(doc.min_similarity);
        Ok(Some(engine))
    }

    fn read_document<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let path = self.dir.join(relative);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| Error::ModelLoad(format!("cannot read {:?}: {}", path, e)))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::ModelLoad(format!("malformed {:?}: {}", path, e)))
    }
}
