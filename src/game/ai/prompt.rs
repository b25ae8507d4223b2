//! Prompt construction
//!
//! Both remote providers ask for the same thing: reason about the position,
//! then finish with a separate `Best Move:` line. The wording is side-aware so
//! either provider can play either colour.
//!
//! The chat-completions provider uses a shorter opening prompt for the very
//! first move of the game; it leaves out the history, the FEN and the four
//! reasoning steps, which only confuse models when there is nothing to read.

use shakmaty::Color;

use crate::game::ai::provider::MoveRequest;

/// System message for chat-completions providers
pub const CHAT_SYSTEM_PROMPT: &str =
    "You are a world-class chess engine. You must follow the user's instructions precisely.";

fn side_name(side: Color) -> &'static str {
    match side {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn legal_list(request: &MoveRequest) -> String {
    request.legal_moves.join(", ")
}

fn game_data(request: &MoveRequest) -> String {
    format!(
        "Here is the game data:\n\
         - Game History (PGN): \"{pgn}\"\n\
         - Current Position (FEN): \"{fen}\"\n\
         - Legal Moves for {side}: [{moves}]",
        pgn = request.pgn,
        fen = request.fen,
        side = side_name(request.side),
        moves = legal_list(request),
    )
}

const CLOSING: &str = "Provide your analysis based on the four steps above. Then, on a final, \
separate line, write \"Best Move:\" followed by your single best move in Standard Algebraic Notation.";

/// Single prompt for the Gemini provider: four steps, every move
pub fn gemini_prompt(request: &MoveRequest) -> String {
    let side = side_name(request.side);
    let opponent = side_name(!request.side);
    format!(
        "You are a world-class chess engine. It is {side}'s turn to move.\n\
         Your thinking process must follow these four steps:\n\
         1.  Read the Game History (PGN) and the Current Position (FEN).\n\
         2.  Analyze the current position, considering material, king safety, and key threats.\n\
         3.  Based on {opponent}'s (the opponent's) moves in the PGN, analyze their likely strategy and predict their next 2-3 possible moves.\n\
         4.  State your chosen move.\n\
         \n\
         {data}\n\
         \n\
         {CLOSING}",
        data = game_data(request),
    )
}

/// User message for the chat-completions provider
pub fn chat_user_prompt(request: &MoveRequest) -> String {
    let side = side_name(request.side);
    if request.is_first_move() {
        return format!(
            "It is {side}'s turn to make the first move of the game. The legal opening moves are \
             [{moves}]. Analyze the best opening strategy (e.g., controlling the center). Provide a \
             brief analysis, then on a final, separate line, write \"Best Move:\" followed by your \
             single best opening move in Standard Algebraic Notation.",
            moves = legal_list(request),
        );
    }

    let opponent = side_name(!request.side);
    format!(
        "It is {side}'s turn to move. Your thinking process must follow these four steps:\n\
         1.  Read the Game History (PGN) and the Current Position (FEN).\n\
         2.  Analyze the current position, considering material, king safety, and key threats for both sides.\n\
         3.  Based on {opponent}'s (the opponent's) moves in the PGN, analyze their likely strategy and predict their next 2-3 possible responses to your potential moves.\n\
         4.  State your chosen move.\n\
         \n\
         {data}\n\
         \n\
         {CLOSING}",
        data = game_data(request),
    )
}
