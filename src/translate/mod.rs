pub mod interface;
pub mod huggingface;
pub mod pipeline_service;
pub mod service;
pub mod factory;

pub use factory::TranslatorFactory;
pub use interface::Translator;
pub use service::TranslationService;
