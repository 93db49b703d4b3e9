// Resume analysis: text extraction, prompt assembly, response interpretation and
// presentation mapping. All completion calls go through llm_client.

pub mod assembler;
pub mod extractor;
pub mod handlers;
pub mod interpreter;
pub mod pipeline;
pub mod presentation;
pub mod prompts;
