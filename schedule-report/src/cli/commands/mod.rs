mod process;
mod stage;

use anyhow::Result;

use super::Commands;
use crate::config::ReportConfig;

pub fn dispatch(command: Commands, config: &ReportConfig) -> Result<()> {
    match command {
        Commands::Process { file, workdir } => process::handle_process_command(&file, &workdir, config),
        Commands::Extract { input, output } => stage::handle_extract_command(&input, &output, config),
        Commands::Reshape {
            input,
            output,
            brand,
            copyline,
        } => stage::handle_reshape_command(&input, &output, brand, copyline),
        Commands::Format { input, output } => stage::handle_format_command(&input, &output, config),
    }
}
