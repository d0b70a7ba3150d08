//! 交互式命令行界面
//!
//! 同步的编号菜单循环：设置 / 同步 / 浏览复习。除了在每次有写动作后
//! 重新读取数据文件外不保留任何会话状态。

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Dataset, Question, Source, UserStatus};
use crate::scraper;
use crate::store::Store;
use anyhow::Result;
use std::io::{self, Write};
use tracing::error;

/// 应用主结构
pub struct App {
    config: Config,
    client: ApiClient,
    store: Store,
}

/// 浏览子循环的出口
enum ListExit {
    BackToList,
    MainMenu,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = ApiClient::new(&config);
        let store = Store::new(&config.data_file);
        Self {
            config,
            client,
            store,
        }
    }

    /// 主菜单循环
    pub async fn run(&mut self) -> Result<()> {
        println!("Loading local data...");
        let mut current_data = self.store.load();
        println!("Loaded {} questions.", current_data.total());

        loop {
            println!("\n--- ErrorTK CLI ---");
            println!("0. Settings (参数设置)");
            println!("1. Sync data (Fetch from API)");
            println!("2. List and review questions");
            println!("3. Exit");

            match read_line("Enter your choice: ").as_str() {
                "0" => self.settings_menu(),
                "1" => {
                    if self.sync_data().await {
                        current_data = self.store.load();
                    }
                }
                "2" => {
                    self.list_questions(&current_data);
                    // 状态可能已变化，重新读取
                    current_data = self.store.load();
                }
                "3" => {
                    println!("Exiting ErrorTK CLI. Goodbye!");
                    break;
                }
                _ => println!("Invalid choice. Please try again."),
            }
        }
        Ok(())
    }

    /// 触发一次同步并落盘；失败时本地文件保持同步前的内容
    async fn sync_data(&mut self) -> bool {
        println!("Starting data synchronization...");
        let dataset = scraper::fetch_all_sources(&self.client, &self.config, &self.store).await;

        let (sim_n, real_n, fam_n) = (
            dataset.simulation.len(),
            dataset.real.len(),
            dataset.famous.len(),
        );
        println!(
            "Summary -> simulation: {}, real: {}, famous: {}",
            sim_n, real_n, fam_n
        );

        if let Err(e) = self.store.save(&dataset) {
            error!("Error during synchronization: {}", e);
            return false;
        }

        println!("Data synchronization complete. Data saved.");
        if sim_n + real_n + fam_n == 0 {
            println!("Warning: No questions fetched. Check TOKEN validity or network, or set INCLUDE_COMMENTS=0 to speed up.");
        }
        true
    }

    /// 设置菜单：评论开关、批大小、TOKEN
    fn settings_menu(&mut self) {
        loop {
            println!("\n--- Settings ---");
            println!(
                "1. INCLUDE_COMMENTS: {}",
                if self.config.include_comments { "ON" } else { "OFF" }
            );
            println!("2. BATCH_SIZE: {}", self.config.batch_size);
            println!(
                "3. TOKEN: {}",
                if self.config.token.is_empty() { "NOT SET" } else { "SET" }
            );
            println!("4. 返回主菜单");

            match read_line("选择要修改的项: ").as_str() {
                "1" => {
                    let val = read_line("是否抓取评论? (y/n): ").to_lowercase();
                    self.config.include_comments = matches!(val.as_str(), "y" | "yes" | "1");
                    println!("INCLUDE_COMMENTS 已更新。");
                }
                "2" => match read_line("请输入批大小（建议 50-80）: ").parse::<usize>() {
                    Ok(n) if n > 0 => {
                        self.config.batch_size = n;
                        println!("BATCH_SIZE 已更新。");
                    }
                    _ => println!("无效的数字。"),
                },
                "3" => {
                    let token = read_line("请输入 TOKEN（不会回显历史）: ");
                    if token.is_empty() {
                        println!("未输入 TOKEN。");
                    } else {
                        self.config.token = token.clone();
                        // 立即重建请求头，后续请求即用新 token
                        self.client.set_token(&token);
                        println!("TOKEN 已更新。");
                    }
                }
                "4" => break,
                _ => println!("无效选择。"),
            }
        }
    }

    /// 浏览 / 过滤 / 复习循环
    fn list_questions(&self, data: &Dataset) {
        println!("\n--- Listing Questions ---");
        let all_questions = flatten_with_source(data);

        if all_questions.is_empty() {
            println!("No questions loaded. Try syncing data first.");
            return;
        }

        loop {
            println!("\nFilter options:");
            println!("  1. All questions");
            println!("  2. By source (simulation, real, famous)");
            println!("  3. By status (new, reviewing, mastered)");
            println!("  4. Back to main menu");
            let choice = read_line("Enter your choice: ");

            let filtered: Vec<&Question> = match choice.as_str() {
                "1" => all_questions.iter().collect(),
                "2" => {
                    let input = read_line("Enter source (simulation, real, famous): ");
                    match input.parse::<Source>() {
                        Ok(source) => all_questions
                            .iter()
                            .filter(|q| q.source == Some(source))
                            .collect(),
                        Err(_) => {
                            println!("Invalid source. Use: simulation | real | famous");
                            continue;
                        }
                    }
                }
                "3" => {
                    let input = read_line("Enter status (new, reviewing, mastered): ");
                    match input.parse::<UserStatus>() {
                        Ok(status) => all_questions
                            .iter()
                            .filter(|q| q.user_status == status)
                            .collect(),
                        Err(_) => {
                            println!("Invalid status. Use: new | reviewing | mastered");
                            continue;
                        }
                    }
                }
                "4" => break,
                _ => {
                    println!("Invalid filter choice.");
                    continue;
                }
            };

            if filtered.is_empty() {
                println!("No questions found with selected filters.");
                continue;
            }

            println!("\nFound {} questions:", filtered.len());
            for (i, q) in filtered.iter().enumerate() {
                print!("{}. ", i + 1);
                display_question_summary(q);
            }

            let detail_choice =
                read_line("\nEnter question number to view details, or 'b' to go back, 'm' for main menu: ");
            match detail_choice.to_lowercase().as_str() {
                "b" => continue,
                "m" => break,
                other => match other.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= filtered.len() => {
                        let selected = filtered[n - 1];
                        display_question_details(selected);
                        if let ListExit::MainMenu = self.status_menu(selected.id) {
                            return;
                        }
                    }
                    Ok(_) => println!("Invalid question number."),
                    Err(_) => println!("Invalid input."),
                },
            }
        }
    }

    /// 查看详情后的状态修改子菜单
    fn status_menu(&self, question_id: i64) -> ListExit {
        loop {
            let action = read_line(
                "\nChange status (n: new, r: reviewing, m: mastered, b: back to list, q: main menu): ",
            )
            .to_lowercase();
            let status = match action.as_str() {
                "n" => UserStatus::New,
                "r" => UserStatus::Reviewing,
                "m" => UserStatus::Mastered,
                "b" => return ListExit::BackToList,
                "q" => return ListExit::MainMenu,
                _ => {
                    println!("Invalid status action.");
                    continue;
                }
            };
            match self.store.update_status(question_id, status) {
                Ok(true) => println!("Question {} marked as '{}'.", question_id, status.to_string().to_lowercase()),
                Ok(false) => println!("Question {} not found in local data.", question_id),
                Err(e) => error!("更新状态失败: {}", e),
            }
            return ListExit::BackToList;
        }
    }
}

/// 把三个桶平铺成一个列表，旧数据缺 source 时按所在桶补上
fn flatten_with_source(data: &Dataset) -> Vec<Question> {
    let mut all = Vec::with_capacity(data.total());
    for (bucket, source) in [
        (&data.simulation, Source::Simulation),
        (&data.real, Source::Real),
        (&data.famous, Source::Famous),
    ] {
        for q in bucket {
            let mut q = q.clone();
            q.source = q.source.or(Some(source));
            all.push(q);
        }
    }
    all
}

fn display_question_summary(question: &Question) {
    let status_icon = match question.user_status {
        UserStatus::Mastered => "✅",
        UserStatus::Reviewing => "🔄",
        UserStatus::New => "🆕",
    };
    println!(
        "  ID: {} | {} {} | {} - {}",
        question.id, status_icon, question.user_status, question.origin_name, question.sub_name
    );
    println!("    Content: {}...", preview(&question.content, 70));
}

fn display_question_details(question: &Question) {
    println!("\n--- Question Details (ID: {}) ---", question.id);
    println!("Source: {} - {}", question.origin_name, question.sub_name);
    println!(
        "Status: {} | Last Reviewed: {}",
        question.user_status,
        question.last_reviewed.as_deref().unwrap_or("Never")
    );
    println!("\nContent:");
    println!("{}", question.content);
    println!("\nOptions:");
    for opt in &question.options {
        println!("  {}. {}", opt.label, opt.content);
    }

    // 答案与解析需要用户确认后才展示
    read_line("\nPress Enter to reveal answer and analysis...");

    println!("\n--- Answer & Analysis ---");
    println!("Correct Answer(s): {}", question.answer.join(", "));
    println!("\nAnalysis:");
    println!("{}", question.analysis);
    if question.comments.is_empty() {
        println!("\nNo comments available.");
    } else {
        println!("\nComments:");
        for comment in &question.comments {
            println!("  - {}", comment);
        }
    }
}

fn preview(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf).is_err() {
        return String::new();
    }
    buf.trim().to_string()
}
