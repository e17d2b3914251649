// OP.GG MCP tool names
pub const SUMMONER_SEARCH: &str = "lol-summoner-search";
pub const GAME_HISTORY: &str = "lol-summoner-game-history";

pub const JSONRPC_VERSION: &str = "2.0";
pub const TOOLS_CALL_METHOD: &str = "tools/call";
pub const USER_AGENT: &str = "lobby_scout/0.1.0";
