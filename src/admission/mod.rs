// 访问准入控制
// 固定窗口：同一客户端在窗口内只有第一次访问会增加计数

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::StoreError;
use crate::store::CounterStore;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 允许增加计数
    Admit,
    /// 只读取计数
    Suppress,
}

/// 客户端准入记录，窗口锚定在最近一次被放行的时间
pub struct AdmissionControl {
    window: Duration,
    records: DashMap<String, Instant>,
}

impl AdmissionControl {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            records: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, client: &str, now: Instant) -> Admission {
        self.decide(client, now).0
    }

    // 返回决定以及放行前的锚点，供失败时回滚
    fn decide(&self, client: &str, now: Instant) -> (Admission, Option<Instant>) {
        let mut admitted = true;
        let mut prior = None;
        self.records
            .entry(client.to_string())
            .and_modify(|last| {
                if now.saturating_duration_since(*last) >= self.window {
                    prior = Some(*last);
                    *last = now;
                } else {
                    // 被抑制的请求不移动窗口
                    admitted = false;
                }
            })
            .or_insert(now);

        let decision = if admitted {
            Admission::Admit
        } else {
            Admission::Suppress
        };
        (decision, prior)
    }

    /// 撤销 `admitted_at` 时刻的放行：恢复之前的锚点，首次访问则删除记录。
    /// 记录已被之后的放行覆盖时不做任何修改
    pub fn revert(&self, client: &str, admitted_at: Instant, prior: Option<Instant>) {
        match prior {
            Some(prior) => {
                if let Some(mut last) = self.records.get_mut(client) {
                    if *last == admitted_at {
                        *last = prior;
                    }
                }
            }
            None => {
                self.records.remove_if(client, |_, last| *last == admitted_at);
            }
        }
    }

    /// 清理已超过一个窗口的记录，清理后的客户端下次访问会直接放行
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, last| now.saturating_duration_since(*last) < self.window);
        before.saturating_sub(self.records.len())
    }

    /// 正在跟踪的客户端数
    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}

impl Default for AdmissionControl {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// 一次访问的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub count: u64,
    pub admission: Admission,
}

/// 放行则加一，否则只读。加一失败时撤销这次放行
pub async fn record_visit<S: CounterStore>(
    store: &S,
    admission: &AdmissionControl,
    client: &str,
    now: Instant,
) -> Result<Visit, StoreError> {
    let (decision, prior) = admission.decide(client, now);
    tracing::debug!("Admission for {}: {:?}", client, decision);

    let count = match decision {
        Admission::Admit => match store.increment().await {
            Ok(count) => count,
            Err(e) => {
                admission.revert(client, now, prior);
                return Err(e);
            }
        },
        Admission::Suppress => store.get_count().await?,
    };

    Ok(Visit {
        count,
        admission: decision,
    })
}

/// 定期清理准入记录，每个窗口执行一次
pub async fn sweeper(admission: std::sync::Arc<AdmissionControl>) {
    let period = admission.window().max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let removed = admission.sweep(Instant::now());
        if removed > 0 {
            tracing::debug!(
                "Swept {} admission records, {} remaining",
                removed,
                admission.tracked_clients()
            );
        }
    }
}
