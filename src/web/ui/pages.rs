//! HTML page rendering.
//!
//! The whole site is one fixed shell document with a single slot for
//! the page body. Fragments are substituted in with plain string
//! replacement; rendering cannot fail.

/// Page shell with the full stylesheet. `{{GAME_BODY}}` is the only
/// slot.
const PAGE_SHELL: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>猜数字游戏</title>
    <style>
        body {
            font-family: 'Courier New', monospace;
            max-width: 600px;
            margin: 0 auto;
            padding: 20px;
            text-align: center;
            background-color: #0a0a1e;
            background-image: linear-gradient(to bottom, #0a0a1e, #1a1a3e);
            color: #00ffff;
            min-height: 100vh;
        }
        h1 {
            font-size: 48px;
            font-weight: bold;
            color: #ff00ff;
            text-shadow: 0 0 10px #ff00ff, 0 0 20px #ff00ff, 0 0 30px #ff00ff;
            margin-bottom: 30px;
        }
        .game-container {
            background-color: rgba(10, 10, 30, 0.8);
            padding: 40px;
            border-radius: 10px;
            box-shadow: 0 0 20px rgba(0, 255, 255, 0.3);
            border: 1px solid rgba(0, 255, 255, 0.5);
            backdrop-filter: blur(5px);
        }
        p {
            font-size: 18px;
            color: #00ffff;
            margin-bottom: 20px;
        }
        input[type="number"] {
            padding: 15px;
            font-size: 20px;
            width: 250px;
            margin: 20px 0;
            background-color: rgba(10, 10, 30, 0.8);
            color: #00ffff;
            border: 2px solid #00ffff;
            border-radius: 5px;
            box-shadow: 0 0 10px rgba(0, 255, 255, 0.5);
            font-family: 'Courier New', monospace;
        }
        input[type="number"]:focus {
            outline: none;
            box-shadow: 0 0 20px rgba(0, 255, 255, 0.8);
            border-color: #ff00ff;
        }
        button {
            padding: 15px 30px;
            font-size: 20px;
            background-color: rgba(255, 0, 255, 0.2);
            color: #ff00ff;
            border: 2px solid #ff00ff;
            border-radius: 5px;
            cursor: pointer;
            font-family: 'Courier New', monospace;
            font-weight: bold;
            box-shadow: 0 0 10px rgba(255, 0, 255, 0.5);
            transition: all 0.3s ease;
        }
        button:hover {
            background-color: rgba(255, 0, 255, 0.4);
            box-shadow: 0 0 20px rgba(255, 0, 255, 0.8);
            transform: translateY(-2px);
        }
        .message {
            margin: 30px 0;
            padding: 25px;
            border-radius: 8px;
            font-weight: bold;
            border: 2px solid;
            box-shadow: 0 0 15px;
        }
        .message.success {
            background-color: rgba(0, 255, 0, 0.2);
            color: #00ff00;
            border-color: #00ff00;
            box-shadow: 0 0 20px rgba(0, 255, 0, 0.7);
            font-size: 32px;
            text-shadow: 0 0 10px #00ff00;
        }
        .message.error {
            background-color: rgba(255, 255, 0, 0.2);
            color: #ffff00;
            border-color: #ffff00;
            box-shadow: 0 0 20px rgba(255, 255, 0, 0.7);
            font-size: 24px;
            text-shadow: 0 0 10px #ffff00;
        }
        .message.info {
            background-color: rgba(0, 255, 255, 0.2);
            color: #00ffff;
            border-color: #00ffff;
            box-shadow: 0 0 15px rgba(0, 255, 255, 0.5);
        }
    </style>
</head>
<body>
    <div class="game-container">
        <h1>猜数字游戏</h1>
        {{GAME_BODY}}
    </div>
</body>
</html>"#;

/// Home fragment: the guess form.
const HOME_BODY: &str = r#"
        <p>我已经想好了一个 1-100 之间的数字，快来猜猜看吧！</p>
        <form method="POST" action="/guess">
            <input type="number" name="number" min="1" max="100" placeholder="请输入猜测的数字" required>
            <br>
            <button type="submit">提交猜测</button>
        </form>
"#;

/// Result fragment: a styled message box and a play-again form.
const RESULT_BODY: &str = r#"
        <div class="message {{MESSAGE_CLASS}}">{{MESSAGE}}</div>
        <form method="GET" action="/">
            <button type="submit">再玩一次</button>
        </form>
"#;

/// Visual class of a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Success,
    Error,
    Info,
}

impl MessageClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Renders a body fragment into the page shell.
#[must_use]
pub fn render_page(body: &str) -> String {
    PAGE_SHELL.replace("{{GAME_BODY}}", body)
}

/// Renders the home page with the guess form.
#[must_use]
pub fn home_page() -> String {
    render_page(HOME_BODY)
}

/// Renders a result page with the given message box.
#[must_use]
pub fn result_page(class: MessageClass, message: &str) -> String {
    let fragment = RESULT_BODY
        .replace("{{MESSAGE_CLASS}}", class.as_str())
        .replace("{{MESSAGE}}", message);
    render_page(&fragment)
}

/// Renders an error page: an info-class message box with the play-again
/// form underneath.
#[must_use]
pub fn error_page(message: &str) -> String {
    result_page(MessageClass::Info, message)
}
