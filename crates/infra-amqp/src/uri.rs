// Broker URI construction

use jobpost_relay_core::BrokerSettings;
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};

/// Build a typed AMQP URI from settings.
///
/// Credentials and vhost are passed as fields, so no percent-encoding of
/// user input is involved.
pub fn broker_uri(settings: &BrokerSettings) -> AMQPUri {
    AMQPUri {
        authority: AMQPAuthority {
            userinfo: AMQPUserInfo {
                username: settings.user.clone(),
                password: settings.pass.clone(),
            },
            host: settings.host.clone(),
            port: settings.port,
        },
        vhost: settings.vhost.clone(),
        ..Default::default()
    }
}
