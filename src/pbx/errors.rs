use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("section not found: no '/* Begin {name} section */' marker")]
    SectionNotFound { name: String },

    #[error("section '{name}' has a begin marker at byte {begin} but no end marker")]
    EndMarkerNotFound { name: String, begin: usize },

    #[error("block not found: anchor '{anchor}' absent from search range")]
    AnchorNotFound { anchor: String },

    #[error("block not found: no '{token}' within {lookahead} bytes of anchor '{anchor}' (byte {at})")]
    BlockNotFound {
        anchor: String,
        token: String,
        lookahead: usize,
        at: usize,
    },

    #[error("no Sources build phase listed for target '{target}'")]
    SourcesPhaseNotFound { target: String },
}

#[derive(Error, Debug)]
pub enum MutateError {
    #[error("splice failed: {0}")]
    Splice(#[from] crate::splice::SpliceError),
}
