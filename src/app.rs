use std::time::{Duration, Instant};

use crate::aggregate::{AggregationEngine, EntityTokens};
use crate::config::ResolvedConfig;
use crate::crossref::CrossReferenceIndex;
use crate::domain::{CategorySummary, RawCell, SummaryKind};
use crate::error::AnnotationError;
use crate::gene_ontology::{self, GoDag};
use crate::hierarchy::Hierarchy;
use crate::source::{DataSource, Resource};
use crate::table::{AnnotationTable, ColumnMatch};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Forwards progress to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                "{}",
                event.message
            ),
            None => tracing::info!("{}", event.message),
        }
    }
}

/// The two reference documents the KEGG summary joins through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeggResources {
    pub hierarchy: Resource,
    pub links: Resource,
}

#[derive(Debug, Clone, Default)]
pub struct KeggReference {
    pub hierarchy: Hierarchy,
    pub crossref: CrossReferenceIndex,
}

pub struct App<S: DataSource> {
    source: S,
    config: ResolvedConfig,
}

impl<S: DataSource> App<S> {
    pub fn new(source: S, config: ResolvedConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn kegg_resources(&self) -> KeggResources {
        KeggResources {
            hierarchy: Resource::Remote(self.config.kegg.hierarchy_url.clone()),
            links: Resource::Remote(self.config.kegg.links_url.clone()),
        }
    }

    pub fn kegg_table(
        &self,
        table: &AnnotationTable,
        resources: &KeggResources,
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        let kegg = &self.config.kegg;
        let value_index = table.column_index(&kegg.annotation_column, ColumnMatch::Exact)?;
        let entity_index = table.entity_index(&self.config.entity_column);
        self.kegg(&table.cells(entity_index, value_index), resources, sink)
    }

    pub fn kegg(
        &self,
        cells: &[RawCell],
        resources: &KeggResources,
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        sink.event(ProgressEvent {
            message: format!("phase=Clean; {} rows", cells.len()),
            elapsed: None,
        });
        let tokenizer = Tokenizer::new(self.config.kegg.tokenizer.clone());
        let entities = EntityTokens::from_cells(&tokenizer, cells);
        if entities.is_empty() {
            return Err(AnnotationError::NoValidAnnotations {
                kind: SummaryKind::Kegg.to_string(),
            });
        }
        sink.event(ProgressEvent {
            message: format!("phase=Clean; {} annotated entities", entities.len()),
            elapsed: None,
        });

        let reference = self.load_kegg_reference(resources, sink)?;

        sink.event(ProgressEvent {
            message: "phase=Aggregate; joining tokens to categories".to_string(),
            elapsed: None,
        });
        let engine = AggregationEngine::new(
            &reference.hierarchy,
            &reference.crossref,
            self.config.kegg.top_n,
        );
        engine.aggregate(&entities)
    }

    /// Fetches and parses both reference documents; the fetches run concurrently.
    pub fn load_kegg_reference(
        &self,
        resources: &KeggResources,
        sink: &dyn ProgressSink,
    ) -> Result<KeggReference, AnnotationError> {
        sink.event(ProgressEvent {
            message: format!(
                "phase=Fetch; {} and {}",
                resources.hierarchy, resources.links
            ),
            elapsed: None,
        });
        let start = Instant::now();
        let (hierarchy_text, links_text) = std::thread::scope(|scope| {
            let hierarchy = scope.spawn(|| self.source.fetch_text(&resources.hierarchy));
            let links = self.source.fetch_text(&resources.links);
            let hierarchy = hierarchy.join().unwrap_or_else(|_| {
                Err(AnnotationError::SourceFetch {
                    resource: resources.hierarchy.to_string(),
                    message: "fetch thread panicked".to_string(),
                })
            });
            (hierarchy, links)
        });
        let hierarchy_text = hierarchy_text?;
        let links_text = links_text?;
        sink.event(ProgressEvent {
            message: "phase=Fetch; reference documents loaded".to_string(),
            elapsed: Some(start.elapsed()),
        });

        let hierarchy = Hierarchy::parse(&hierarchy_text);
        if hierarchy.is_empty() {
            tracing::warn!(resource = %resources.hierarchy, "hierarchy document has no usable leaf records");
        }
        let crossref = CrossReferenceIndex::parse(&links_text);
        if crossref.is_empty() {
            tracing::warn!(resource = %resources.links, "relation feed has no usable lines");
        }
        sink.event(ProgressEvent {
            message: format!(
                "phase=Parse; {} pathway maps, {} tokens, {} links",
                hierarchy.leaf_count(),
                crossref.token_count(),
                crossref.edge_count()
            ),
            elapsed: None,
        });

        Ok(KeggReference {
            hierarchy,
            crossref,
        })
    }

    pub fn cog_table(
        &self,
        table: &AnnotationTable,
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        let value_index = table.column_index(&self.config.cog.column, ColumnMatch::Contains)?;
        let entity_index = table.entity_index(&self.config.entity_column);
        self.cog(&table.cells(entity_index, value_index), sink)
    }

    pub fn cog(
        &self,
        cells: &[RawCell],
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        sink.event(ProgressEvent {
            message: format!("phase=Aggregate; counting COG letters in {} rows", cells.len()),
            elapsed: None,
        });
        crate::cog::summarize(cells, &self.config.absent_sentinel)
    }

    pub fn go_table(
        &self,
        table: &AnnotationTable,
        obo: &Resource,
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        let value_index = table.column_index(&self.config.go.column, ColumnMatch::Exact)?;
        let entity_index = table.entity_index(&self.config.entity_column);
        self.go(&table.cells(entity_index, value_index), obo, sink)
    }

    pub fn go(
        &self,
        cells: &[RawCell],
        obo: &Resource,
        sink: &dyn ProgressSink,
    ) -> Result<CategorySummary, AnnotationError> {
        sink.event(ProgressEvent {
            message: format!("phase=Fetch; {obo}"),
            elapsed: None,
        });
        let start = Instant::now();
        let dag = GoDag::parse(&self.source.fetch_text(obo)?);
        sink.event(ProgressEvent {
            message: format!(
                "phase=Parse; {} GO terms (version {})",
                dag.len(),
                dag.version().unwrap_or("unknown")
            ),
            elapsed: Some(start.elapsed()),
        });
        gene_ontology::summarize(
            cells,
            &dag,
            &self.config.absent_sentinel,
            self.config.go.top_n,
        )
    }
}
