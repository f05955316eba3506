mod entry;

pub mod storage {
    pub mod v1 {
        tonic::include_proto!("storage.v1");
    }
}

pub mod v1 {
    pub use crate::entry::v1::*;
    pub use crate::storage::v1::*;
}
