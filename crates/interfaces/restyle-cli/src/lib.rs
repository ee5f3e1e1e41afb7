pub mod commands;

use clap::ValueEnum;
use restyle_app_core::FlowKind;

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum CliOutput {
    Text,
    Json,
}

impl From<CliFlow> for FlowKind {
    fn from(flow: CliFlow) -> Self {
        match flow {
            CliFlow::Style => FlowKind::SingleShot,
            CliFlow::Multi => FlowKind::MultiPrompt,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum CliFlow {
    /// One style image and one source image to one result
    Style,
    /// Reference image to three prompts and three results
    Multi,
}
