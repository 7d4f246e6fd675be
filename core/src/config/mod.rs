mod load;
mod types;

pub use load::{
    apply_env_overrides, expand_roots, get_data_dir, load_default, ENV_CKPT_ROOT, ENV_CONVERTER,
    ENV_MODEL_ROOT,
};
pub use types::*;
