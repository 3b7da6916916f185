//! Print the analyses directory of a user

use super::CommandContext;
use skein_core::error::SkeinResult;
use skein_core::utils::analyses_dir;

pub async fn execute(org: String, user: String, ctx: &CommandContext) -> SkeinResult<()> {
    ctx.output.data(&analyses_dir(&org, &user));
    Ok(())
}
