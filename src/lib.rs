pub mod aggregate;
pub mod app;
pub mod cog;
pub mod config;
pub mod crossref;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod gene_ontology;
pub mod hierarchy;
pub mod output;
pub mod source;
pub mod table;
pub mod tokenizer;
